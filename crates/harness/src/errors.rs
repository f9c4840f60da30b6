//! Harness errors module

use nossis_distribution::ConfigError;
use thiserror::Error;

/// A backend's refusal of a request, as reported by the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ValidationError {
    /// API error code, e.g. `NoSuchOrigin`
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by a [`crate::DistributionBackend`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{source}")]
    Rejected { source: ValidationError },

    #[error("NoSuchDistribution: distribution {id} does not exist")]
    NoSuchDistribution { id: String },
}

/// Harness-level errors
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Sandbox violation: {reason}")]
    SandboxViolation { reason: String },

    #[error("Region {region} is not known to the simulated backend")]
    UnknownRegion { region: String },

    #[error("Backend rejected the request: {source}")]
    Validation { source: ValidationError },

    #[error("Distribution {id} does not exist")]
    NoSuchDistribution { id: String },

    #[error("Configuration error: {source}")]
    Config { source: ConfigError },
}

impl From<BackendError> for HarnessError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected { source } => HarnessError::Validation { source },
            BackendError::NoSuchDistribution { id } => HarnessError::NoSuchDistribution { id },
        }
    }
}

impl From<ConfigError> for HarnessError {
    fn from(err: ConfigError) -> Self {
        HarnessError::Config { source: err }
    }
}
