//! Client handle for a distribution backend.

use tracing::debug;

use nossis_distribution::{
    CreatedDistribution, Distribution, DistributionConfig, DistributionSummary,
};

use crate::backend::DistributionBackend;
use crate::errors::HarnessError;

/// Handle bound to one backend for the backend's lifetime
pub struct ClientHandle<'a> {
    backend: &'a dyn DistributionBackend,
    region: String,
}

impl<'a> ClientHandle<'a> {
    pub fn new(backend: &'a dyn DistributionBackend, region: impl Into<String>) -> Self {
        Self {
            backend,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Submit a configuration. Backend rejections come back unchanged as
    /// [`HarnessError::Validation`].
    pub fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<CreatedDistribution, HarnessError> {
        debug!(caller_reference = %config.caller_reference, "submitting distribution");
        Ok(self.backend.create_distribution(config)?)
    }

    pub fn get_distribution(&self, id: &str) -> Result<Distribution, HarnessError> {
        Ok(self.backend.get_distribution(id)?)
    }

    /// Configuration and ETag of an existing distribution
    pub fn get_distribution_config(
        &self,
        id: &str,
    ) -> Result<(DistributionConfig, String), HarnessError> {
        Ok(self.backend.get_distribution_config(id)?)
    }

    pub fn list_distributions(&self) -> Vec<DistributionSummary> {
        self.backend.list_distributions()
    }
}
