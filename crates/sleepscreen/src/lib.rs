//! Core library for the sleep screening service: the questionnaire engine,
//! configuration, error surface, and telemetry bootstrap.

pub mod config;
pub mod error;
pub mod quiz;
pub mod telemetry;

pub use config::{AppConfig, AppEnvironment, ConfigError, QuizConfig, ServerConfig, TelemetryConfig};
pub use error::AppError;
