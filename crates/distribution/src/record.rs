//! Records a backend returns for distributions it manages.
//!
//! These mirror the response shapes of the distribution-management API so
//! that the simulated backend and any real client agree on what a created
//! distribution looks like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::DistributionConfig;

/// Deployment state of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionStatus {
    InProgress,
    Deployed,
}

impl DistributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionStatus::InProgress => "InProgress",
            DistributionStatus::Deployed => "Deployed",
        }
    }
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend's canonical record of one distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    /// Backend-assigned identifier
    pub id: String,
    #[serde(rename = "ARN")]
    pub arn: String,
    pub status: DistributionStatus,
    pub last_modified_time: DateTime<Utc>,
    pub in_progress_invalidation_batches: u32,
    /// Backend-assigned edge hostname
    pub domain_name: String,
    /// Configuration exactly as submitted
    pub distribution_config: DistributionConfig,
}

/// Result of a successful creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedDistribution {
    /// Resource URL of the new distribution
    pub location: String,
    /// Version tag of the stored configuration
    #[serde(rename = "ETag")]
    pub e_tag: String,
    pub distribution: Distribution,
}

/// Abbreviated view used when listing distributions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionSummary {
    pub id: String,
    #[serde(rename = "ARN")]
    pub arn: String,
    pub status: DistributionStatus,
    pub last_modified_time: DateTime<Utc>,
    pub domain_name: String,
    pub comment: String,
    pub enabled: bool,
    pub staging: bool,
}

impl From<&Distribution> for DistributionSummary {
    fn from(distribution: &Distribution) -> Self {
        let config = &distribution.distribution_config;
        Self {
            id: distribution.id.clone(),
            arn: distribution.arn.clone(),
            status: distribution.status,
            last_modified_time: distribution.last_modified_time,
            domain_name: distribution.domain_name.clone(),
            comment: config.comment.clone(),
            enabled: config.enabled,
            staging: config.staging,
        }
    }
}
