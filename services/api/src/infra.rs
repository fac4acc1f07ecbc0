use crate::cli::ArtifactArgs;
use chrono::{DateTime, Utc};
use churn_ai::churn::{ChurnArtifacts, ChurnPredictor};
use churn_ai::config::{AppConfig, ArtifactConfig};
use churn_ai::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model_name: String,
    pub(crate) artifacts_loaded_at: DateTime<Utc>,
}

impl ArtifactArgs {
    pub(crate) fn apply(&self, config: &mut ArtifactConfig) {
        if let Some(dir) = &self.artifact_dir {
            config.dir = dir.clone();
        }
    }
}

/// Load configuration and apply the command line artifact override.
pub(crate) fn load_config(artifacts: &ArtifactArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    artifacts.apply(&mut config.artifacts);
    Ok(config)
}

/// Read all artifacts, failing before anything is served.
pub(crate) fn load_predictor(config: &ArtifactConfig) -> Result<Arc<ChurnPredictor>, AppError> {
    let paths = config.paths();
    let artifacts = ChurnArtifacts::load(&paths)?;
    let summary = artifacts.summary();

    info!(
        model = %summary.model_name,
        shape = ?summary.network_shape,
        geographies = ?summary.geographies,
        genders = ?summary.genders,
        model_path = %paths.model.display(),
        "churn artifacts loaded"
    );

    Ok(Arc::new(ChurnPredictor::new(Arc::new(artifacts))))
}
