//! Customer churn scoring: input validation, feature assembly, scaling,
//! classification and presentation over a set of pre-fitted artifacts.

pub mod artifacts;
pub mod batch;
pub mod domain;
pub mod features;
pub mod form;
pub(crate) mod html;
pub mod predictor;
pub mod presenter;
pub mod router;
pub mod schema;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactLoadError, ArtifactPaths, ArtifactSummary, ChurnArtifacts, Classifier, LabelMapper,
    OneHotEncoder, StandardScaler,
};
pub use batch::{score_csv, BatchError, BatchSummary, RejectedRow, ScoredRow};
pub use domain::{CategoryCode, CustomerProfile, CustomerSubmission, InputError};
pub use features::{FeatureAssembler, FeatureVector, NormalizedVector};
pub use form::CustomerForm;
pub use predictor::{ChurnError, ChurnPredictor, PredictionError, ScoringTrace};
pub use presenter::{AssessmentView, ChurnAssessment, ChurnVerdict, CHURN_THRESHOLD};
pub use router::churn_router;
pub use schema::{form_schema, FieldControl, FieldDescriptor, FormSchema};
