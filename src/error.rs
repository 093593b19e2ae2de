//! Error types for safe-follow

use thiserror::Error;

/// Errors that abort a control cycle or a configuration load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    /// The vehicle's own lane cell could not be found from its pose.
    #[error("no lane polygon found near vehicle position ({x:.2}, {y:.2})")]
    UnresolvablePosition { x: f64, y: f64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for NavError {
    fn from(e: serde_json::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
