//! Configuration Builder
//!
//! Assembles complete distribution configurations for a static site. The
//! [`build`] function yields the canonical configuration; the
//! [`DistributionConfigBuilder`] starts from the same defaults and lets
//! callers override individual policies. Either way the result has already
//! passed [`ConfigValidator`], so an invalid configuration never leaves this
//! module.

use tracing::debug;

use crate::errors::ConfigError;
use crate::model::{
    AllowedMethods, CustomErrorResponse, DefaultCacheBehavior, DistributionConfig,
    GeoRestriction, LoggingConfig, Origin, PriceClass, Restrictions, ViewerCertificate,
    ViewerProtocolPolicy,
};
use crate::validation::ConfigValidator;
use crate::wire::QuantityList;

/// Id of the origin created from the site hostname
pub const DEFAULT_ORIGIN_ID: &str = "site-origin";

/// Object served for requests to `/`
pub const DEFAULT_ROOT_OBJECT: &str = "index.html";

/// Page served in place of origin errors
pub const ERROR_PAGE_PATH: &str = "/error.html";

pub const DEFAULT_COMMENT: &str = "Static site";

/// Managed cache policy: caching optimized
pub const DEFAULT_CACHE_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// Managed origin request policy forwarded with every request
pub const DEFAULT_ORIGIN_REQUEST_POLICY_ID: &str = "acba4595-bd28-49b8-b9fe-13317c0390fa";

/// Managed response headers policy: security headers
pub const DEFAULT_RESPONSE_HEADERS_POLICY_ID: &str = "67f7725c-6f97-4210-82d7-5512b31e9d03";

/// Origin statuses remapped to the error page
pub const ERROR_CODES: [u16; 11] = [400, 403, 404, 405, 414, 416, 500, 501, 502, 503, 504];

/// Build the canonical configuration for a site served from `hostname`.
///
/// Only an empty hostname is rejected; anything else about the hostname is
/// left to the backend.
pub fn build(hostname: &str, caller_reference: &str) -> Result<DistributionConfig, ConfigError> {
    DistributionConfigBuilder::new(hostname, caller_reference).build()
}

/// Step-by-step construction of a [`DistributionConfig`]
#[derive(Debug, Clone)]
pub struct DistributionConfigBuilder {
    hostname: String,
    caller_reference: String,
    comment: String,
    default_root_object: String,
    extra_origins: Vec<Origin>,
    target_origin_id: String,
    error_page_path: String,
    error_caching_min_ttl: Option<u64>,
    logging: LoggingConfig,
    price_class: PriceClass,
    enabled: bool,
    viewer_certificate: ViewerCertificate,
    geo_restriction: GeoRestriction,
    is_ipv6_enabled: bool,
    staging: bool,
}

impl DistributionConfigBuilder {
    pub fn new(hostname: impl Into<String>, caller_reference: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            caller_reference: caller_reference.into(),
            comment: DEFAULT_COMMENT.to_string(),
            default_root_object: DEFAULT_ROOT_OBJECT.to_string(),
            extra_origins: Vec::new(),
            target_origin_id: DEFAULT_ORIGIN_ID.to_string(),
            error_page_path: ERROR_PAGE_PATH.to_string(),
            error_caching_min_ttl: None,
            logging: LoggingConfig::disabled(),
            price_class: PriceClass::PriceClass100,
            enabled: true,
            viewer_certificate: ViewerCertificate::default(),
            geo_restriction: GeoRestriction::none(),
            is_ipv6_enabled: true,
            staging: false,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn default_root_object(mut self, path: impl Into<String>) -> Self {
        self.default_root_object = path.into();
        self
    }

    /// Add an origin next to the one built from the hostname
    pub fn origin(mut self, origin: Origin) -> Self {
        self.extra_origins.push(origin);
        self
    }

    /// Route the default cache behavior to another origin id
    pub fn target_origin(mut self, origin_id: impl Into<String>) -> Self {
        self.target_origin_id = origin_id.into();
        self
    }

    pub fn error_page(mut self, path: impl Into<String>) -> Self {
        self.error_page_path = path.into();
        self
    }

    pub fn error_caching_min_ttl(mut self, seconds: u64) -> Self {
        self.error_caching_min_ttl = Some(seconds);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn price_class(mut self, price_class: PriceClass) -> Self {
        self.price_class = price_class;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn viewer_certificate(mut self, certificate: ViewerCertificate) -> Self {
        self.viewer_certificate = certificate;
        self
    }

    pub fn geo_restriction(mut self, restriction: GeoRestriction) -> Self {
        self.geo_restriction = restriction;
        self
    }

    pub fn ipv6(mut self, enabled: bool) -> Self {
        self.is_ipv6_enabled = enabled;
        self
    }

    pub fn staging(mut self, staging: bool) -> Self {
        self.staging = staging;
        self
    }

    /// Assemble and validate the configuration
    pub fn build(self) -> Result<DistributionConfig, ConfigError> {
        if self.hostname.is_empty() {
            return Err(ConfigError::InvalidConfig {
                reason: "hostname must not be empty".to_string(),
            });
        }

        let mut origins = vec![Origin::custom(DEFAULT_ORIGIN_ID, self.hostname.clone())];
        origins.extend(self.extra_origins);

        let error_responses = ERROR_CODES
            .iter()
            .map(|&code| {
                let mut response = CustomErrorResponse::new(code, self.error_page_path.clone());
                response.error_caching_min_ttl = self.error_caching_min_ttl;
                response
            })
            .collect::<QuantityList<_>>();

        let config = DistributionConfig {
            caller_reference: self.caller_reference,
            default_root_object: self.default_root_object,
            origins: QuantityList::new(origins),
            default_cache_behavior: DefaultCacheBehavior {
                target_origin_id: self.target_origin_id,
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                allowed_methods: AllowedMethods::read_only(),
                compress: true,
                cache_policy_id: Some(DEFAULT_CACHE_POLICY_ID.to_string()),
                origin_request_policy_id: Some(DEFAULT_ORIGIN_REQUEST_POLICY_ID.to_string()),
                response_headers_policy_id: Some(DEFAULT_RESPONSE_HEADERS_POLICY_ID.to_string()),
            },
            custom_error_responses: error_responses,
            comment: self.comment,
            logging: self.logging,
            price_class: self.price_class,
            enabled: self.enabled,
            viewer_certificate: self.viewer_certificate,
            restrictions: Restrictions {
                geo_restriction: self.geo_restriction,
            },
            is_ipv6_enabled: self.is_ipv6_enabled,
            staging: self.staging,
        };

        let report = ConfigValidator::new().validate(&config);
        if !report.is_valid {
            return Err(ConfigError::Invariant {
                violations: report.violations,
            });
        }

        debug!(
            hostname = %self.hostname,
            caller_reference = %config.caller_reference,
            "built distribution configuration"
        );

        Ok(config)
    }
}
