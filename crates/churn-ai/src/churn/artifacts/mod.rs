//! Pre-fitted preprocessing objects and the pretrained classifier.
//!
//! All four artifacts are JSON exports loaded once at startup. Loading is
//! all-or-nothing: a missing, unreadable or inconsistent file aborts with an
//! [`ArtifactLoadError`] naming the offending path.

mod classifier;
mod encoders;
mod scaler;

pub use classifier::{Activation, Classifier, DenseLayer};
pub use encoders::{LabelMapper, OneHotEncoder};
pub use scaler::StandardScaler;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::churn::features::feature_columns;

pub const GENDER_ENCODER_FILE: &str = "label_encoder_gender.json";
pub const GEOGRAPHY_ENCODER_FILE: &str = "onehot_encoder_geo.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";

/// Locations of the four artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub gender_encoder: PathBuf,
    pub geography_encoder: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside a single artifact directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            gender_encoder: dir.join(GENDER_ENCODER_FILE),
            geography_encoder: dir.join(GEOGRAPHY_ENCODER_FILE),
            scaler: dir.join(SCALER_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to deserialize artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact {} is invalid: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("artifacts are inconsistent: {0}")]
    Incompatible(String),
}

/// Immutable context holding every fitted object needed to score a customer.
///
/// Built once per process and shared behind an `Arc`; nothing mutates it
/// after construction.
#[derive(Debug, Clone)]
pub struct ChurnArtifacts {
    gender: LabelMapper,
    geography: OneHotEncoder,
    scaler: StandardScaler,
    classifier: Classifier,
    loaded_at: DateTime<Utc>,
}

impl ChurnArtifacts {
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let gender: LabelMapper = read_artifact(&paths.gender_encoder)?;
        gender.validate().map_err(|reason| invalid(&paths.gender_encoder, reason))?;

        let geography: OneHotEncoder = read_artifact(&paths.geography_encoder)?;
        geography
            .validate()
            .map_err(|reason| invalid(&paths.geography_encoder, reason))?;

        let scaler: StandardScaler = read_artifact(&paths.scaler)?;
        scaler.validate().map_err(|reason| invalid(&paths.scaler, reason))?;

        let classifier: Classifier = read_artifact(&paths.model)?;
        classifier.validate().map_err(|reason| invalid(&paths.model, reason))?;

        Self::from_parts(gender, geography, scaler, classifier)
    }

    /// Assemble a context from already deserialized parts, running the same
    /// consistency checks as [`ChurnArtifacts::load`].
    pub fn from_parts(
        gender: LabelMapper,
        geography: OneHotEncoder,
        scaler: StandardScaler,
        classifier: Classifier,
    ) -> Result<Self, ArtifactLoadError> {
        gender.validate().map_err(ArtifactLoadError::Incompatible)?;
        geography.validate().map_err(ArtifactLoadError::Incompatible)?;
        scaler.validate().map_err(ArtifactLoadError::Incompatible)?;
        classifier.validate().map_err(ArtifactLoadError::Incompatible)?;

        let columns = feature_columns(&geography);
        if scaler.dimension() != columns.len() {
            return Err(ArtifactLoadError::Incompatible(format!(
                "scaler was fitted on {} columns but the encoders produce {}",
                scaler.dimension(),
                columns.len()
            )));
        }
        if let Some(names) = &scaler.feature_names {
            if names != &columns {
                return Err(ArtifactLoadError::Incompatible(format!(
                    "scaler column order [{}] differs from assembled order [{}]",
                    names.join(", "),
                    columns.join(", ")
                )));
            }
        }
        if classifier.input_dim() != scaler.dimension() {
            return Err(ArtifactLoadError::Incompatible(format!(
                "classifier expects {} inputs but the scaler emits {}",
                classifier.input_dim(),
                scaler.dimension()
            )));
        }

        Ok(Self {
            gender,
            geography,
            scaler,
            classifier,
            loaded_at: Utc::now(),
        })
    }

    pub fn gender(&self) -> &LabelMapper {
        &self.gender
    }

    pub fn geography(&self) -> &OneHotEncoder {
        &self.geography
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn feature_columns(&self) -> Vec<String> {
        feature_columns(&self.geography)
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            model_name: self.classifier.name.clone(),
            network_shape: self.classifier.shape(),
            genders: self.gender.classes().to_vec(),
            geographies: self.geography.categories().to_vec(),
            feature_columns: self.feature_columns(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Serializable description of the loaded artifacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    pub model_name: String,
    pub network_shape: Vec<usize>,
    pub genders: Vec<String>,
    pub geographies: Vec<String>,
    pub feature_columns: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    debug!(path = %path.display(), "loading artifact");
    let file = File::open(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, reason: String) -> ArtifactLoadError {
    ArtifactLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}
