//! Simulated Distribution Backend
//!
//! An in-memory stand-in for the distribution-management API. It accepts the
//! same configuration payloads, assigns identifiers and timestamps, and
//! enforces the API's validation rules, so tests can exercise the full
//! create/read cycle without any network.
//!
//! A [`SimulatedBackend`] only starts from a sandboxed [`ClientContext`], and
//! all of its state is dropped with it.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use nossis_distribution::{
    ConfigValidator, CreatedDistribution, Distribution, DistributionConfig, DistributionStatus,
    DistributionSummary, ValidatorConfig,
};

use crate::client::ClientHandle;
use crate::environment::{CREDENTIAL_VARIABLES, PROFILE};
use crate::errors::{BackendError, HarnessError, ValidationError};
use crate::sandbox::ClientContext;

/// Regions the simulated backend recognises without the nonexistent-region toggle
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
];

/// API version segment used in resource locations
const API_VERSION: &str = "2020-05-31";

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated distribution ids, including the leading `E`
const ID_LEN: usize = 14;

/// The distribution-management operations a client can call
pub trait DistributionBackend {
    /// Validate and store a new distribution
    fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<CreatedDistribution, BackendError>;

    /// Fetch a distribution by id
    fn get_distribution(&self, id: &str) -> Result<Distribution, BackendError>;

    /// Fetch a distribution's configuration and its current ETag
    fn get_distribution_config(
        &self,
        id: &str,
    ) -> Result<(DistributionConfig, String), BackendError>;

    /// Summaries of every stored distribution, ordered by id
    fn list_distributions(&self) -> Vec<DistributionSummary>;
}

/// Settings for the simulated backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Account id embedded in ARNs
    pub account_id: String,
    /// Suffix of backend-assigned domain names
    pub domain_suffix: String,
    /// Accept any region name, regardless of the context's toggle
    pub allow_nonexistent_region: bool,
    /// Maximum origins per distribution
    pub max_origins: usize,
    /// Reject logging fields set while logging is disabled
    pub strict_logging: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            account_id: "123456789012".to_string(),
            domain_suffix: "cloudfront.net".to_string(),
            allow_nonexistent_region: false,
            max_origins: nossis_distribution::validation::DEFAULT_MAX_ORIGINS,
            strict_logging: false,
        }
    }
}

impl BackendSettings {
    /// Settings that accept any region and warn instead of failing where possible
    pub fn permissive() -> Self {
        Self {
            allow_nonexistent_region: true,
            ..Default::default()
        }
    }

    /// Settings that reject everything the API might reject
    pub fn strict() -> Self {
        Self {
            strict_logging: true,
            ..Default::default()
        }
    }

    fn validator(&self) -> ConfigValidator {
        ConfigValidator::with_config(ValidatorConfig {
            max_origins: self.max_origins,
            strict_logging: self.strict_logging,
        })
    }
}

struct StoredDistribution {
    distribution: Distribution,
    e_tag: String,
}

#[derive(Default)]
struct BackendState {
    distributions: BTreeMap<String, StoredDistribution>,
    /// caller reference -> distribution id
    caller_references: HashMap<String, String>,
}

/// In-memory distribution-management backend
pub struct SimulatedBackend {
    settings: BackendSettings,
    region: String,
    state: RefCell<BackendState>,
}

impl SimulatedBackend {
    /// Start a backend with default settings
    pub fn start(context: &ClientContext) -> Result<Self, HarnessError> {
        Self::start_with_settings(context, BackendSettings::default())
    }

    /// Start a backend; the context must come from a sandbox
    pub fn start_with_settings(
        context: &ClientContext,
        settings: BackendSettings,
    ) -> Result<Self, HarnessError> {
        check_context(context)?;

        // check_context guarantees both region variables are present.
        let region = context.region().unwrap_or_default().to_string();
        let allow_any = settings.allow_nonexistent_region
            || context.environment().allows_nonexistent_region();
        if !allow_any && !KNOWN_REGIONS.contains(&region.as_str()) {
            warn!(%region, "refusing unknown region");
            return Err(HarnessError::UnknownRegion { region });
        }

        debug!(%region, "simulated backend started");

        Ok(Self {
            settings,
            region,
            state: RefCell::new(BackendState::default()),
        })
    }

    /// A client bound to this backend; it cannot outlive the backend
    pub fn client(&self) -> ClientHandle<'_> {
        ClientHandle::new(self, self.region.clone())
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// Number of distributions currently stored
    pub fn distribution_count(&self) -> usize {
        self.state.borrow().distributions.len()
    }

    fn reject(code: &str, message: impl Into<String>) -> BackendError {
        let source = ValidationError::new(code, message);
        warn!(code = %source.code, message = %source.message, "request rejected");
        BackendError::Rejected { source }
    }

    fn check_submission(
        &self,
        state: &BackendState,
        config: &DistributionConfig,
    ) -> Result<(), BackendError> {
        if config.caller_reference.is_empty() {
            return Err(Self::reject("InvalidArgument", "CallerReference is required"));
        }

        if let Some(existing) = state.caller_references.get(&config.caller_reference) {
            return Err(Self::reject(
                "DistributionAlreadyExists",
                format!(
                    "The caller reference is already associated with distribution {}",
                    existing
                ),
            ));
        }

        let report = self.settings.validator().validate(config);
        for warning in &report.warnings {
            debug!(%warning, "configuration warning");
        }
        if let Some(violation) = report.first_violation() {
            return Err(Self::reject(violation.code(), violation.to_string()));
        }

        Ok(())
    }

    fn generate_id(state: &BackendState) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (1..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("E{}", suffix);
            if !state.distributions.contains_key(&id) {
                return id;
            }
        }
    }
}

impl DistributionBackend for SimulatedBackend {
    fn create_distribution(
        &self,
        config: &DistributionConfig,
    ) -> Result<CreatedDistribution, BackendError> {
        let mut state = self.state.borrow_mut();
        self.check_submission(&state, config)?;

        let e_tag = config_etag(config)?;
        let id = Self::generate_id(&state);
        let distribution = Distribution {
            id: id.clone(),
            arn: format!(
                "arn:aws:cloudfront::{}:distribution/{}",
                self.settings.account_id, id
            ),
            status: DistributionStatus::InProgress,
            last_modified_time: Utc::now(),
            in_progress_invalidation_batches: 0,
            domain_name: format!("{}.{}", id.to_lowercase(), self.settings.domain_suffix),
            distribution_config: config.clone(),
        };

        state
            .caller_references
            .insert(config.caller_reference.clone(), id.clone());
        state.distributions.insert(
            id.clone(),
            StoredDistribution {
                distribution: distribution.clone(),
                e_tag: e_tag.clone(),
            },
        );

        info!(%id, domain = %distribution.domain_name, "distribution created");

        Ok(CreatedDistribution {
            location: format!(
                "https://cloudfront.amazonaws.com/{}/distribution/{}",
                API_VERSION, id
            ),
            e_tag,
            distribution,
        })
    }

    fn get_distribution(&self, id: &str) -> Result<Distribution, BackendError> {
        self.state
            .borrow()
            .distributions
            .get(id)
            .map(|stored| stored.distribution.clone())
            .ok_or_else(|| BackendError::NoSuchDistribution { id: id.to_string() })
    }

    fn get_distribution_config(
        &self,
        id: &str,
    ) -> Result<(DistributionConfig, String), BackendError> {
        self.state
            .borrow()
            .distributions
            .get(id)
            .map(|stored| {
                (
                    stored.distribution.distribution_config.clone(),
                    stored.e_tag.clone(),
                )
            })
            .ok_or_else(|| BackendError::NoSuchDistribution { id: id.to_string() })
    }

    fn list_distributions(&self) -> Vec<DistributionSummary> {
        self.state
            .borrow()
            .distributions
            .values()
            .map(|stored| DistributionSummary::from(&stored.distribution))
            .collect()
    }
}

impl Drop for SimulatedBackend {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let count = state.distributions.len();
        state.distributions.clear();
        state.caller_references.clear();
        debug!(region = %self.region, discarded = count, "simulated backend stopped");
    }
}

/// Refuse contexts that could carry real credentials
fn check_context(context: &ClientContext) -> Result<(), HarnessError> {
    if !context.is_sandboxed() {
        return Err(HarnessError::SandboxViolation {
            reason: "backend started without an active sandbox".to_string(),
        });
    }

    let environment = context.environment();
    if environment.contains(PROFILE) {
        return Err(HarnessError::SandboxViolation {
            reason: format!("{} must be absent inside a sandbox", PROFILE),
        });
    }

    if let Some(missing) = CREDENTIAL_VARIABLES
        .iter()
        .find(|variable| environment.get(variable).is_none())
    {
        return Err(HarnessError::SandboxViolation {
            reason: format!("{} is not set by the sandbox", missing),
        });
    }

    Ok(())
}

/// Version tag derived from the configuration's serialized form
fn config_etag(config: &DistributionConfig) -> Result<String, BackendError> {
    let bytes = serde_json::to_vec(config)
        .map_err(|e| SimulatedBackend::reject("InternalError", e.to_string()))?;
    let digest = blake3::hash(&bytes);
    Ok(hex::encode_upper(&digest.as_bytes()[..7]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Environment, ALLOW_NONEXISTENT_REGION, REGION};
    use crate::sandbox::Sandbox;
    use nossis_distribution::build;

    fn sandbox() -> Sandbox {
        Sandbox::acquire(&Environment::new())
    }

    #[test]
    fn test_requires_sandbox() {
        let context = ClientContext::from_environment(Environment::new());
        let result = SimulatedBackend::start(&context);

        assert!(matches!(result, Err(HarnessError::SandboxViolation { .. })));
    }

    #[test]
    fn test_profile_selector_rejected() {
        let context = sandbox().context().with_variable(PROFILE, "default");
        let result = SimulatedBackend::start(&context);

        assert!(matches!(result, Err(HarnessError::SandboxViolation { .. })));
    }

    #[test]
    fn test_unknown_region_needs_toggle() {
        let context = sandbox()
            .context()
            .with_variable(ALLOW_NONEXISTENT_REGION, "False");
        let result = SimulatedBackend::start(&context);
        assert!(matches!(result, Err(HarnessError::UnknownRegion { .. })));

        let result = SimulatedBackend::start_with_settings(&context, BackendSettings::permissive());
        assert!(result.is_ok());

        let context = context.with_variable(REGION, "eu-west-1");
        let backend = SimulatedBackend::start(&context).unwrap();
        assert_eq!(backend.region(), "eu-west-1");
    }

    #[test]
    fn test_create_assigns_identity() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        let config = build("example.org", "ref-1").unwrap();

        let created = backend.create_distribution(&config).unwrap();
        let distribution = &created.distribution;

        assert!(distribution.id.starts_with('E'));
        assert_eq!(distribution.id.len(), ID_LEN);
        assert_eq!(distribution.status, DistributionStatus::InProgress);
        assert_eq!(
            distribution.domain_name,
            format!("{}.cloudfront.net", distribution.id.to_lowercase())
        );
        assert!(distribution.arn.ends_with(&distribution.id));
        assert!(created.location.ends_with(&distribution.id));
        assert_eq!(distribution.distribution_config, config);
        assert_eq!(backend.distribution_count(), 1);
    }

    #[test]
    fn test_caller_reference_reuse_rejected() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        let config = build("example.org", "ref-1").unwrap();
        backend.create_distribution(&config).unwrap();

        let err = backend.create_distribution(&config).unwrap_err();
        match err {
            BackendError::Rejected { source } => {
                assert_eq!(source.code, "DistributionAlreadyExists")
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(backend.distribution_count(), 1);
    }

    #[test]
    fn test_empty_caller_reference_rejected() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        let config = build("example.org", "").unwrap();

        let err = backend.create_distribution(&config).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Rejected { ref source } if source.code == "InvalidArgument"
        ));
    }

    #[test]
    fn test_etag_matches_config() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        let config = build("example.org", "ref-1").unwrap();
        let created = backend.create_distribution(&config).unwrap();

        let (stored, e_tag) = backend
            .get_distribution_config(&created.distribution.id)
            .unwrap();
        assert_eq!(stored, config);
        assert_eq!(e_tag, created.e_tag);
        assert_eq!(e_tag.len(), 14);
    }

    #[test]
    fn test_missing_distribution() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        assert_eq!(
            backend.get_distribution("E000").unwrap_err(),
            BackendError::NoSuchDistribution {
                id: "E000".to_string()
            }
        );
    }

    #[test]
    fn test_list_distributions() {
        let backend = SimulatedBackend::start(&sandbox().context()).unwrap();
        for reference in ["a", "b", "c"] {
            backend
                .create_distribution(&build("example.org", reference).unwrap())
                .unwrap();
        }

        let summaries = backend.list_distributions();
        assert_eq!(summaries.len(), 3);
        assert!(summaries.windows(2).all(|pair| pair[0].id < pair[1].id));
    }
}
