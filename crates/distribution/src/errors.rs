//! Configuration errors module

use thiserror::Error;

use crate::validation::Violation;

/// Errors raised while assembling a distribution configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Configuration breaks {} rule(s): {}", .violations.len(), join_violations(.violations))]
    Invariant { violations: Vec<Violation> },

    #[error("Serialization error: {source}")]
    SerializationError { source: serde_json::Error },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::SerializationError { source: err }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
