//! End-to-end tests: sandbox, simulated backend and builder together.

use nossis_distribution::{build, DistributionConfigBuilder, HttpMethod, Origin};
use nossis_harness::environment::{CREDENTIAL_VARIABLES, PROFILE};
use nossis_harness::{
    fixtures, with_simulated_backend, BackendSettings, ClientContext, Environment, HarnessError,
    Sandbox, SimulatedBackend,
};

fn ambient_with_real_looking_credentials() -> Environment {
    let mut env: Environment = CREDENTIAL_VARIABLES
        .iter()
        .map(|&name| (name, "AKIAEXAMPLEEXAMPLE"))
        .collect();
    env.set(PROFILE, "production");
    env
}

#[test]
fn test_sandbox_isolation() {
    let before = ambient_with_real_looking_credentials();
    let sandbox = Sandbox::acquire(&before);

    for variable in CREDENTIAL_VARIABLES {
        assert_ne!(sandbox.environment().get(variable), before.get(variable));
    }
    assert!(!sandbox.environment().contains(PROFILE));
}

#[test]
fn test_end_to_end_distribution() {
    let sandbox = Sandbox::acquire(&ambient_with_real_looking_credentials());

    let created = with_simulated_backend(&sandbox, |client| {
        let config = build("example.org", "2024-01-01T00:00:00+00:00")?;
        client.create_distribution(&config)
    })
    .unwrap();

    let distribution = &created.distribution;
    assert_eq!(
        distribution.distribution_config.origins.items()[0].domain_name,
        "example.org"
    );
    assert!(!distribution.status.as_str().is_empty());
    assert!(!distribution.id.is_empty());
    assert!(!created.e_tag.is_empty());
}

#[test]
fn test_mismatched_target_origin_is_validation_error() {
    let sandbox = Sandbox::acquire(&Environment::new());

    let result = with_simulated_backend(&sandbox, |client| {
        let mut config = build("example.org", "ref")?;
        config.default_cache_behavior.target_origin_id = "elsewhere".to_string();
        client.create_distribution(&config)
    });

    match result {
        Err(HarnessError::Validation { source }) => {
            assert_eq!(source.code, "NoSuchOrigin");
            assert!(source.message.contains("elsewhere"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_cached_method_outside_allowed_is_rejected() {
    let sandbox = Sandbox::acquire(&Environment::new());

    let result = with_simulated_backend(&sandbox, |client| {
        let mut config = build("example.org", "ref")?;
        config
            .default_cache_behavior
            .allowed_methods
            .cached_methods
            .push(HttpMethod::Post);
        client.create_distribution(&config)
    });

    assert!(matches!(result, Err(HarnessError::Validation { .. })));
}

#[test]
fn test_backend_without_sandbox_is_refused() {
    let context = ClientContext::from_environment(ambient_with_real_looking_credentials());

    let result = SimulatedBackend::start(&context);
    assert!(matches!(result, Err(HarnessError::SandboxViolation { .. })));
}

#[test]
fn test_empty_hostname_never_reaches_backend() {
    let sandbox = Sandbox::acquire(&Environment::new());
    let backend = SimulatedBackend::start(&sandbox.context()).unwrap();
    let client = backend.client();

    let result = fixtures::distribution_for(&client, "", "ref");
    assert!(matches!(result, Err(HarnessError::Config { .. })));
    assert_eq!(backend.distribution_count(), 0);
}

#[test]
fn test_created_distribution_can_be_read_back() {
    let sandbox = Sandbox::acquire(&Environment::new());
    let backend = SimulatedBackend::start(&sandbox.context()).unwrap();
    let client = backend.client();

    let created = fixtures::distribution(&client).unwrap();
    let id = &created.distribution.id;

    assert_eq!(client.get_distribution(id).unwrap(), created.distribution);
    let (config, e_tag) = client.get_distribution_config(id).unwrap();
    assert_eq!(config, created.distribution.distribution_config);
    assert_eq!(e_tag, created.e_tag);

    let listed = client.list_distributions();
    assert_eq!(listed.len(), 1);
    assert_eq!(&listed[0].id, id);
}

#[test]
fn test_backends_do_not_share_state() {
    let sandbox = Sandbox::acquire(&Environment::new());

    let first = SimulatedBackend::start(&sandbox.context()).unwrap();
    fixtures::distribution_for(&first.client(), "example.org", "same-ref").unwrap();

    let second = SimulatedBackend::start(&sandbox.context()).unwrap();
    assert_eq!(second.distribution_count(), 0);
    // The same caller reference is fresh in a new backend.
    fixtures::distribution_for(&second.client(), "example.org", "same-ref").unwrap();
}

#[test]
fn test_strict_settings_reject_ignored_logging_fields() {
    let sandbox = Sandbox::acquire(&Environment::new());
    let mut config = build("example.org", "ref").unwrap();
    config.logging.prefix = "logs/".to_string();

    let lenient = with_simulated_backend(&sandbox, |client| client.create_distribution(&config));
    assert!(lenient.is_ok());

    let strict = nossis_harness::with_simulated_backend_settings(
        &sandbox,
        BackendSettings::strict(),
        |client| client.create_distribution(&config),
    );
    assert!(matches!(strict, Err(HarnessError::Validation { .. })));
}

#[test]
fn test_multi_origin_configuration() {
    let sandbox = Sandbox::acquire(&Environment::new());
    let config = DistributionConfigBuilder::new("example.org", "ref")
        .origin(Origin::custom("assets", "assets.example.org"))
        .target_origin("assets")
        .build()
        .unwrap();

    let created =
        with_simulated_backend(&sandbox, |client| client.create_distribution(&config)).unwrap();
    assert_eq!(
        created
            .distribution
            .distribution_config
            .default_cache_behavior
            .target_origin_id,
        "assets"
    );
}
