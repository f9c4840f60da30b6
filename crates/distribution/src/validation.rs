//! Configuration Validation Module
//!
//! Checks a [`DistributionConfig`] against the structural rules the
//! distribution-management API enforces: origin references resolve, method
//! sets nest, logging fields are present when logging is on, and error
//! remappings are well formed.

use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::model::{DistributionConfig, GeoRestrictionType, HttpMethod};

/// Maximum origins per distribution (API quota)
pub const DEFAULT_MAX_ORIGINS: usize = 25;

/// Method sets the API accepts for `AllowedMethods`
pub const ACCEPTED_METHOD_SETS: &[&[HttpMethod]] = &[
    &[HttpMethod::Get, HttpMethod::Head],
    &[HttpMethod::Get, HttpMethod::Head, HttpMethod::Options],
    &[
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ],
];

/// A single rule a configuration breaks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("At least one origin is required")]
    NoOrigins,

    #[error("{count} origins exceeds the maximum of {max}")]
    TooManyOrigins { count: usize, max: usize },

    #[error("Origin at position {index} has an empty id")]
    EmptyOriginId { index: usize },

    #[error("Origin id {id} is used more than once")]
    DuplicateOriginId { id: String },

    #[error("Origin {id} has an empty domain name")]
    EmptyOriginDomain { id: String },

    #[error("Origin {id} has invalid port {port}")]
    InvalidOriginPort { id: String, port: u16 },

    #[error("Origin {id} lists no SSL protocols")]
    NoOriginSslProtocols { id: String },

    #[error("Default cache behavior targets unknown origin {target_origin_id}")]
    NoSuchOrigin { target_origin_id: String },

    #[error("Unsupported allowed methods: {methods}")]
    UnsupportedAllowedMethods { methods: String },

    #[error("Cached method {method} is not an allowed method")]
    CachedMethodNotAllowed { method: HttpMethod },

    #[error("Logging is enabled but no bucket is set")]
    LoggingBucketRequired,

    #[error("Logging is enabled but no prefix is set")]
    LoggingPrefixRequired,

    #[error("Logging is disabled but bucket or prefix is set")]
    LoggingFieldsWhileDisabled,

    #[error("Error code {code} is not an HTTP 4xx/5xx status")]
    InvalidErrorCode { code: u16 },

    #[error("Error code {code} is remapped more than once")]
    DuplicateErrorCode { code: u16 },

    #[error("Error code {code} has invalid response page path {path:?}")]
    InvalidResponsePagePath { code: u16, path: String },

    #[error("A custom viewer certificate requires a certificate ARN")]
    MissingCertificateArn,

    #[error("Geo restriction {restriction_type:?} cannot have {count} location(s)")]
    InvalidGeoLocations {
        restriction_type: GeoRestrictionType,
        count: usize,
    },
}

impl Violation {
    /// Error code the distribution-management API reports for this violation
    pub fn code(&self) -> &'static str {
        match self {
            Violation::NoOrigins
            | Violation::EmptyOriginId { .. }
            | Violation::EmptyOriginDomain { .. }
            | Violation::InvalidOriginPort { .. }
            | Violation::NoOriginSslProtocols { .. } => "InvalidOrigin",
            Violation::TooManyOrigins { .. } => "TooManyOrigins",
            Violation::DuplicateOriginId { .. } => "DuplicateOriginId",
            Violation::NoSuchOrigin { .. } => "NoSuchOrigin",
            Violation::UnsupportedAllowedMethods { .. }
            | Violation::CachedMethodNotAllowed { .. } => "InvalidArgument",
            Violation::LoggingBucketRequired
            | Violation::LoggingPrefixRequired
            | Violation::LoggingFieldsWhileDisabled => "InvalidLoggingConfig",
            Violation::InvalidErrorCode { .. } | Violation::DuplicateErrorCode { .. } => {
                "InvalidErrorCode"
            }
            Violation::InvalidResponsePagePath { .. } => "InvalidResponseCode",
            Violation::MissingCertificateArn => "InvalidViewerCertificate",
            Violation::InvalidGeoLocations { .. } => "InvalidLocationCode",
        }
    }
}

/// Outcome of validating one configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Whether the configuration passed validation
    pub is_valid: bool,
    /// Rules the configuration breaks
    pub violations: Vec<Violation>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_findings(violations: Vec<Violation>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
            warnings,
        }
    }

    /// First violation found, in rule order
    pub fn first_violation(&self) -> Option<&Violation> {
        self.violations.first()
    }
}

/// Configuration for the validator
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Maximum number of origins
    pub max_origins: usize,
    /// Reject (instead of warn about) logging fields set while logging is off
    pub strict_logging: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_origins: DEFAULT_MAX_ORIGINS,
            strict_logging: false,
        }
    }
}

/// Distribution configuration validator
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator {
    config: ValidatorConfig,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate every rule and collect all findings
    pub fn validate(&self, config: &DistributionConfig) -> ValidationReport {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        self.check_origins(config, &mut violations);
        self.check_cache_behavior(config, &mut violations);
        self.check_logging(config, &mut violations, &mut warnings);
        self.check_error_responses(config, &mut violations);
        self.check_certificate_and_restrictions(config, &mut violations);

        ValidationReport::from_findings(violations, warnings)
    }

    fn check_origins(&self, config: &DistributionConfig, violations: &mut Vec<Violation>) {
        if config.origins.is_empty() {
            violations.push(Violation::NoOrigins);
            return;
        }

        if config.origins.quantity() > self.config.max_origins {
            violations.push(Violation::TooManyOrigins {
                count: config.origins.quantity(),
                max: self.config.max_origins,
            });
        }

        let mut seen = HashSet::new();
        for (index, origin) in config.origins.iter().enumerate() {
            if origin.id.is_empty() {
                violations.push(Violation::EmptyOriginId { index });
            } else if !seen.insert(origin.id.as_str()) {
                violations.push(Violation::DuplicateOriginId {
                    id: origin.id.clone(),
                });
            }

            if origin.domain_name.trim().is_empty() {
                violations.push(Violation::EmptyOriginDomain {
                    id: origin.id.clone(),
                });
            }

            let custom = &origin.custom_origin_config;
            for port in [custom.http_port, custom.https_port] {
                if port == 0 {
                    violations.push(Violation::InvalidOriginPort {
                        id: origin.id.clone(),
                        port,
                    });
                }
            }

            if custom.origin_ssl_protocols.is_empty() {
                violations.push(Violation::NoOriginSslProtocols {
                    id: origin.id.clone(),
                });
            }
        }
    }

    fn check_cache_behavior(&self, config: &DistributionConfig, violations: &mut Vec<Violation>) {
        let behavior = &config.default_cache_behavior;

        let matches = config
            .origins
            .iter()
            .filter(|origin| origin.id == behavior.target_origin_id)
            .count();
        // Duplicate ids are reported by the origin check; only a miss matters here.
        if matches == 0 {
            violations.push(Violation::NoSuchOrigin {
                target_origin_id: behavior.target_origin_id.clone(),
            });
        }

        let allowed: BTreeSet<HttpMethod> =
            behavior.allowed_methods.methods.iter().copied().collect();
        let accepted = ACCEPTED_METHOD_SETS
            .iter()
            .any(|set| set.iter().copied().collect::<BTreeSet<_>>() == allowed);
        if !accepted {
            let methods = allowed
                .iter()
                .map(HttpMethod::as_str)
                .collect::<Vec<_>>()
                .join(",");
            violations.push(Violation::UnsupportedAllowedMethods { methods });
        }

        let mut reported = BTreeSet::new();
        for &method in behavior.allowed_methods.cached_methods.iter() {
            if !allowed.contains(&method) && reported.insert(method) {
                violations.push(Violation::CachedMethodNotAllowed { method });
            }
        }
    }

    fn check_logging(
        &self,
        config: &DistributionConfig,
        violations: &mut Vec<Violation>,
        warnings: &mut Vec<String>,
    ) {
        let logging = &config.logging;

        if logging.enabled {
            if logging.bucket.is_empty() {
                violations.push(Violation::LoggingBucketRequired);
            }
            if logging.prefix.is_empty() {
                violations.push(Violation::LoggingPrefixRequired);
            }
        } else if !logging.bucket.is_empty() || !logging.prefix.is_empty() {
            if self.config.strict_logging {
                violations.push(Violation::LoggingFieldsWhileDisabled);
            } else {
                warnings.push("Logging is disabled; bucket and prefix are ignored".to_string());
            }
        }
    }

    fn check_error_responses(&self, config: &DistributionConfig, violations: &mut Vec<Violation>) {
        let mut seen = HashSet::new();

        for response in config.custom_error_responses.iter() {
            let code = response.error_code;

            if !(400..=599).contains(&code) {
                violations.push(Violation::InvalidErrorCode { code });
            }
            if !seen.insert(code) {
                violations.push(Violation::DuplicateErrorCode { code });
            }
            if !response.response_page_path.starts_with('/') {
                violations.push(Violation::InvalidResponsePagePath {
                    code,
                    path: response.response_page_path.clone(),
                });
            }
        }
    }

    fn check_certificate_and_restrictions(
        &self,
        config: &DistributionConfig,
        violations: &mut Vec<Violation>,
    ) {
        let certificate = &config.viewer_certificate;
        let has_arn = certificate
            .acm_certificate_arn
            .as_deref()
            .is_some_and(|arn| !arn.is_empty());
        if !certificate.cloudfront_default_certificate && !has_arn {
            violations.push(Violation::MissingCertificateArn);
        }

        let geo = &config.restrictions.geo_restriction;
        let count = geo.locations.quantity();
        let consistent = match geo.restriction_type {
            GeoRestrictionType::None => count == 0,
            GeoRestrictionType::Whitelist | GeoRestrictionType::Blacklist => count > 0,
        };
        if !consistent {
            violations.push(Violation::InvalidGeoLocations {
                restriction_type: geo.restriction_type,
                count,
            });
        }
    }
}

/// Convenience function to validate a configuration with default settings
pub fn validate_config(config: &DistributionConfig) -> ValidationReport {
    ConfigValidator::new().validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::model::{CustomErrorResponse, LoggingConfig, Origin};
    use crate::wire::QuantityList;

    fn valid_config() -> DistributionConfig {
        build("example.org", "ref-1").unwrap()
    }

    #[test]
    fn test_built_config_is_valid() {
        let report = validate_config(&valid_config());
        assert!(report.is_valid, "{:?}", report.violations);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unknown_target_origin() {
        let mut config = valid_config();
        config.default_cache_behavior.target_origin_id = "missing".to_string();

        let report = validate_config(&config);
        assert!(!report.is_valid);
        assert_eq!(
            report.first_violation(),
            Some(&Violation::NoSuchOrigin {
                target_origin_id: "missing".to_string()
            })
        );
        assert_eq!(report.violations[0].code(), "NoSuchOrigin");
    }

    #[test]
    fn test_empty_origins() {
        let mut config = valid_config();
        config.origins = QuantityList::empty();

        let report = validate_config(&config);
        assert!(report.violations.contains(&Violation::NoOrigins));
    }

    #[test]
    fn test_duplicate_origin_ids() {
        let mut config = valid_config();
        let id = config.origins.items()[0].id.clone();
        config.origins.push(Origin::custom(id.clone(), "mirror.example.org"));

        let report = validate_config(&config);
        assert_eq!(report.violations, vec![Violation::DuplicateOriginId { id }]);
    }

    #[test]
    fn test_cached_methods_must_be_allowed() {
        let mut config = valid_config();
        config
            .default_cache_behavior
            .allowed_methods
            .cached_methods
            .push(HttpMethod::Options);

        let report = validate_config(&config);
        assert_eq!(
            report.violations,
            vec![Violation::CachedMethodNotAllowed {
                method: HttpMethod::Options
            }]
        );
    }

    #[test]
    fn test_partial_method_set_rejected() {
        let mut config = valid_config();
        config.default_cache_behavior.allowed_methods.methods =
            QuantityList::new(vec![HttpMethod::Get, HttpMethod::Head, HttpMethod::Post]);

        let report = validate_config(&config);
        assert!(matches!(
            report.violations[0],
            Violation::UnsupportedAllowedMethods { .. }
        ));
    }

    #[test]
    fn test_logging_requires_bucket_and_prefix() {
        let mut config = valid_config();
        config.logging = LoggingConfig::to_bucket("", "");

        let report = validate_config(&config);
        assert_eq!(
            report.violations,
            vec![Violation::LoggingBucketRequired, Violation::LoggingPrefixRequired]
        );
    }

    #[test]
    fn test_disabled_logging_fields_warn_unless_strict() {
        let mut config = valid_config();
        config.logging.bucket = "logs.example.org".to_string();

        let report = validate_config(&config);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);

        let strict = ConfigValidator::with_config(ValidatorConfig {
            strict_logging: true,
            ..Default::default()
        });
        let report = strict.validate(&config);
        assert_eq!(report.violations, vec![Violation::LoggingFieldsWhileDisabled]);
    }

    #[test]
    fn test_error_code_rules() {
        let mut config = valid_config();
        config.custom_error_responses = QuantityList::new(vec![
            CustomErrorResponse::new(404, "/error.html"),
            CustomErrorResponse::new(404, "/other.html"),
            CustomErrorResponse::new(302, "/error.html"),
            CustomErrorResponse::new(500, ""),
        ]);

        let report = validate_config(&config);
        assert_eq!(
            report.violations,
            vec![
                Violation::DuplicateErrorCode { code: 404 },
                Violation::InvalidErrorCode { code: 302 },
                Violation::InvalidResponsePagePath {
                    code: 500,
                    path: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_custom_certificate_needs_arn() {
        let mut config = valid_config();
        config.viewer_certificate.cloudfront_default_certificate = false;

        let report = validate_config(&config);
        assert_eq!(report.violations, vec![Violation::MissingCertificateArn]);

        config.viewer_certificate.acm_certificate_arn =
            Some("arn:aws:acm:us-east-1:123456789012:certificate/abc".to_string());
        assert!(validate_config(&config).is_valid);
    }

    #[test]
    fn test_too_many_origins() {
        let mut config = valid_config();
        let validator = ConfigValidator::with_config(ValidatorConfig {
            max_origins: 1,
            ..Default::default()
        });
        config.origins.push(Origin::custom("second", "second.example.org"));

        let report = validator.validate(&config);
        assert_eq!(
            report.violations,
            vec![Violation::TooManyOrigins { count: 2, max: 1 }]
        );
    }
}
