use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::artifacts::ChurnArtifacts;
use super::domain::{CustomerProfile, CustomerSubmission, InputError};
use super::features::{FeatureAssembler, FeatureVector, NormalizedVector};
use super::presenter::ChurnAssessment;

/// Internal invariant violations raised between assembly and inference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error("{stage} expected a vector of length {expected}, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("classifier produced a non-finite probability")]
    NonFiniteOutput,
}

/// Error raised when scoring a raw submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChurnError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Every intermediate value produced while scoring one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringTrace {
    pub features: FeatureVector,
    pub normalized: NormalizedVector,
    pub assessment: ChurnAssessment,
}

/// Scores customers against a shared, immutable artifact context.
#[derive(Debug, Clone)]
pub struct ChurnPredictor {
    artifacts: Arc<ChurnArtifacts>,
}

impl ChurnPredictor {
    pub fn new(artifacts: Arc<ChurnArtifacts>) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ChurnArtifacts {
        &self.artifacts
    }

    pub fn assembler(&self) -> FeatureAssembler<'_> {
        FeatureAssembler::new(self.artifacts.gender(), self.artifacts.geography())
    }

    /// Validate, encode, scale and classify a raw submission.
    pub fn assess(&self, submission: &CustomerSubmission) -> Result<ChurnAssessment, ChurnError> {
        self.trace(submission).map(|trace| trace.assessment)
    }

    pub fn trace(&self, submission: &CustomerSubmission) -> Result<ScoringTrace, ChurnError> {
        let profile = self.assembler().profile_from_submission(submission)?;
        Ok(self.trace_profile(&profile)?)
    }

    fn trace_profile(&self, profile: &CustomerProfile) -> Result<ScoringTrace, PredictionError> {
        let features = self.assembler().assemble(profile);
        let (normalized, probability) = self
            .infer(&features)
            .inspect_err(|err| error!(error = %err, "churn scoring invariant violated"))?;

        let assessment = ChurnAssessment::from_probability(probability);
        debug!(
            probability = assessment.probability,
            likely_to_churn = assessment.verdict.is_likely(),
            "customer scored"
        );

        Ok(ScoringTrace {
            features,
            normalized,
            assessment,
        })
    }

    fn infer(&self, features: &FeatureVector) -> Result<(NormalizedVector, f64), PredictionError> {
        let normalized = self.artifacts.scaler().transform(features)?;
        let probability = self.artifacts.classifier().predict_proba(&normalized)?;
        Ok((normalized, probability))
    }
}
