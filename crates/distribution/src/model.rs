//! Distribution Configuration Model
//!
//! Typed rendition of one content-delivery endpoint: where content comes
//! from, how viewers reach it, how errors are presented and which TLS
//! policy applies. Field names on the wire follow the distribution-management
//! API (PascalCase, lists wrapped in [`QuantityList`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConfigError;
use crate::wire::QuantityList;

/// HTTP methods a cache behavior can forward or cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Put,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Every method the API knows about
    pub fn all() -> Vec<HttpMethod> {
        vec![
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Put,
            HttpMethod::Post,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol policy between viewers and the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
    HttpsOnly,
    RedirectToHttps,
}

/// Protocol policy between the edge and the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginProtocolPolicy {
    HttpOnly,
    MatchViewer,
    HttpsOnly,
}

/// TLS/SSL versions the edge may use when talking to a custom origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SslProtocol {
    #[serde(rename = "SSLv3")]
    SslV3,
    #[serde(rename = "TLSv1")]
    TlsV1,
    #[serde(rename = "TLSv1.1")]
    TlsV1_1,
    #[serde(rename = "TLSv1.2")]
    TlsV1_2,
}

/// Edge locations the distribution is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceClass {
    #[serde(rename = "PriceClass_100")]
    PriceClass100,
    #[serde(rename = "PriceClass_200")]
    PriceClass200,
    #[serde(rename = "PriceClass_All")]
    PriceClassAll,
}

/// Minimum TLS version and cipher suite offered to viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinimumProtocolVersion {
    #[serde(rename = "SSLv3")]
    SslV3,
    #[serde(rename = "TLSv1")]
    TlsV1,
    #[serde(rename = "TLSv1_2016")]
    TlsV1_2016,
    #[serde(rename = "TLSv1.1_2016")]
    TlsV1_1_2016,
    #[serde(rename = "TLSv1.2_2018")]
    TlsV1_2_2018,
    #[serde(rename = "TLSv1.2_2019")]
    TlsV1_2_2019,
    #[serde(rename = "TLSv1.2_2021")]
    TlsV1_2_2021,
}

/// How the edge serves HTTPS requests for a custom certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslSupportMethod {
    SniOnly,
    Vip,
    StaticIp,
}

/// Geographic restriction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoRestrictionType {
    None,
    Whitelist,
    Blacklist,
}

/// Connection settings for an origin that is not an object-storage bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomOriginConfig {
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    #[serde(rename = "HTTPSPort")]
    pub https_port: u16,
    pub origin_protocol_policy: OriginProtocolPolicy,
    pub origin_ssl_protocols: QuantityList<SslProtocol>,
}

impl Default for CustomOriginConfig {
    fn default() -> Self {
        Self {
            http_port: 80,
            https_port: 443,
            origin_protocol_policy: OriginProtocolPolicy::HttpsOnly,
            origin_ssl_protocols: QuantityList::new(vec![SslProtocol::TlsV1_2]),
        }
    }
}

/// A server the distribution fetches content from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    /// Unique within the distribution; referenced by cache behaviors
    pub id: String,
    pub domain_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin_path: String,
    pub custom_origin_config: CustomOriginConfig,
}

impl Origin {
    /// An HTTPS-only custom origin with default ports and TLS 1.2
    pub fn custom(id: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain_name: domain_name.into(),
            origin_path: String::new(),
            custom_origin_config: CustomOriginConfig::default(),
        }
    }
}

/// Methods forwarded to the origin, with the subset whose responses are cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllowedMethods {
    #[serde(flatten)]
    pub methods: QuantityList<HttpMethod>,
    pub cached_methods: QuantityList<HttpMethod>,
}

impl AllowedMethods {
    /// GET and HEAD, both cached
    pub fn read_only() -> Self {
        let methods = vec![HttpMethod::Get, HttpMethod::Head];
        Self {
            methods: QuantityList::new(methods.clone()),
            cached_methods: QuantityList::new(methods),
        }
    }

    pub fn allows(&self, method: HttpMethod) -> bool {
        self.methods.items().contains(&method)
    }
}

/// Cache behavior applied to every request no other behavior matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    /// Must name exactly one entry of `DistributionConfig::origins`
    pub target_origin_id: String,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: AllowedMethods,
    pub compress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_policy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_request_policy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers_policy_id: Option<String>,
}

/// Remaps an origin error status to a custom page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomErrorResponse {
    pub error_code: u16,
    /// Status returned to the viewer; a string on the wire
    pub response_code: String,
    pub response_page_path: String,
    #[serde(
        rename = "ErrorCachingMinTTL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_caching_min_ttl: Option<u64>,
}

impl CustomErrorResponse {
    /// Serve `page` for `error_code`, keeping the original status
    pub fn new(error_code: u16, page: impl Into<String>) -> Self {
        Self {
            error_code,
            response_code: error_code.to_string(),
            response_page_path: page.into(),
            error_caching_min_ttl: None,
        }
    }
}

/// Access log settings; `bucket` and `prefix` matter only when enabled
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfig {
    pub enabled: bool,
    pub include_cookies: bool,
    pub bucket: String,
    pub prefix: String,
}

impl LoggingConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn to_bucket(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            enabled: true,
            include_cookies: false,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

/// Certificate presented to viewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewerCertificate {
    #[serde(rename = "CloudFrontDefaultCertificate")]
    pub cloudfront_default_certificate: bool,
    #[serde(
        rename = "ACMCertificateArn",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub acm_certificate_arn: Option<String>,
    #[serde(
        rename = "SSLSupportMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ssl_support_method: Option<SslSupportMethod>,
    pub minimum_protocol_version: MinimumProtocolVersion,
}

impl Default for ViewerCertificate {
    fn default() -> Self {
        Self {
            cloudfront_default_certificate: true,
            acm_certificate_arn: None,
            ssl_support_method: None,
            minimum_protocol_version: MinimumProtocolVersion::TlsV1_2_2021,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoRestriction {
    pub restriction_type: GeoRestrictionType,
    /// ISO 3166-1 alpha-2 country codes
    #[serde(flatten)]
    pub locations: QuantityList<String>,
}

impl GeoRestriction {
    pub fn none() -> Self {
        Self {
            restriction_type: GeoRestrictionType::None,
            locations: QuantityList::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Restrictions {
    pub geo_restriction: GeoRestriction,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            geo_restriction: GeoRestriction::none(),
        }
    }
}

/// Root configuration of one content-delivery endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    /// Idempotency token, unique per creation request
    pub caller_reference: String,
    pub default_root_object: String,
    pub origins: QuantityList<Origin>,
    pub default_cache_behavior: DefaultCacheBehavior,
    pub custom_error_responses: QuantityList<CustomErrorResponse>,
    pub comment: String,
    pub logging: LoggingConfig,
    pub price_class: PriceClass,
    pub enabled: bool,
    pub viewer_certificate: ViewerCertificate,
    pub restrictions: Restrictions,
    #[serde(rename = "IsIPV6Enabled")]
    pub is_ipv6_enabled: bool,
    pub staging: bool,
}

impl DistributionConfig {
    /// Look up an origin by id
    pub fn origin(&self, id: &str) -> Option<&Origin> {
        self.origins.iter().find(|origin| origin.id == id)
    }

    /// The origin the default cache behavior routes to, if it exists
    pub fn target_origin(&self) -> Option<&Origin> {
        self.origin(&self.default_cache_behavior.target_origin_id)
    }

    /// Serialize to the API's JSON shape
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationError { source: e })
    }

    /// Parse from the API's JSON shape; invariants are not checked here
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::SerializationError { source: e })
    }
}
