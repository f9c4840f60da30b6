//! Nossis distribution configuration
//!
//! This crate defines the typed configuration of a content-delivery
//! distribution for a static site, the builder that assembles it, the
//! validation rules it must satisfy and the records a backend returns once
//! the distribution exists.

pub mod builder;
pub mod errors;
pub mod model;
pub mod record;
pub mod validation;
pub mod wire;

pub use builder::{build, DistributionConfigBuilder};
pub use errors::ConfigError;
pub use model::{
    AllowedMethods, CustomErrorResponse, CustomOriginConfig, DefaultCacheBehavior,
    DistributionConfig, GeoRestriction, GeoRestrictionType, HttpMethod, LoggingConfig,
    MinimumProtocolVersion, Origin, OriginProtocolPolicy, PriceClass, Restrictions, SslProtocol,
    SslSupportMethod, ViewerCertificate, ViewerProtocolPolicy,
};
pub use record::{CreatedDistribution, Distribution, DistributionStatus, DistributionSummary};
pub use validation::{validate_config, ConfigValidator, ValidationReport, ValidatorConfig, Violation};
pub use wire::QuantityList;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Package name, as published
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Package version, resolved at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_resolved() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "nossis-distribution");
    }
}
