pub mod churn;
pub mod config;
pub mod error;
pub mod telemetry;
