use crate::churn::{ArtifactLoadError, BatchError, ChurnError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Artifact(ArtifactLoadError),
    Scoring(ChurnError),
    Batch(BatchError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::Scoring(ChurnError::Input(err)) => write!(f, "rejected input: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Batch(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Scoring(ChurnError::Input(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Batch(BatchError::Csv(_)) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Artifact(_)
            | AppError::Scoring(_)
            | AppError::Batch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ArtifactLoadError> for AppError {
    fn from(value: ArtifactLoadError) -> Self {
        Self::Artifact(value)
    }
}

impl From<ChurnError> for AppError {
    fn from(value: ChurnError) -> Self {
        Self::Scoring(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::churn::{InputError, PredictionError};

    #[test]
    fn rejected_input_maps_to_unprocessable_entity() {
        let err = AppError::from(ChurnError::Input(InputError::NotFinite { field: "balance" }));
        assert_eq!(err.to_string(), "rejected input: balance must be a finite number");
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn shape_mismatch_is_an_internal_error() {
        let err = AppError::from(ChurnError::Prediction(PredictionError::ShapeMismatch {
            stage: "scaler",
            expected: 12,
            actual: 11,
        }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
