use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::churn::ArtifactPaths;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let artifacts = ArtifactConfig {
            dir: env::var("CHURN_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("artifacts")),
            gender_encoder: path_override("CHURN_GENDER_ENCODER_PATH")?,
            geography_encoder: path_override("CHURN_GEOGRAPHY_ENCODER_PATH")?,
            scaler: path_override("CHURN_SCALER_PATH")?,
            model: path_override("CHURN_MODEL_PATH")?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets: environment == AppEnvironment::Development,
            },
            artifacts,
        })
    }
}

fn path_override(key: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { key }),
        Ok(value) => Ok(Some(PathBuf::from(value))),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
}

/// Where the fitted artifacts live. Individual paths win over the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub gender_encoder: Option<PathBuf>,
    pub geography_encoder: Option<PathBuf>,
    pub scaler: Option<PathBuf>,
    pub model: Option<PathBuf>,
}

impl ArtifactConfig {
    pub fn paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::from_dir(&self.dir);
        ArtifactPaths {
            gender_encoder: self
                .gender_encoder
                .clone()
                .unwrap_or(defaults.gender_encoder),
            geography_encoder: self
                .geography_encoder
                .clone()
                .unwrap_or(defaults.geography_encoder),
            scaler: self.scaler.clone().unwrap_or(defaults.scaler),
            model: self.model.clone().unwrap_or(defaults.model),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyPath { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyPath { key } => write!(f, "{key} must not be empty when set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::EmptyPath { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
