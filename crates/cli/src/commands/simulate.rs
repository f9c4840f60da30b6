//! Simulate command implementation
//!
//! Runs the full creation flow offline: sandbox the process environment,
//! start the in-memory backend, submit a configuration and print what the
//! backend returned.

use anyhow::{Context, Result};
use tracing::debug;

use nossis_distribution::{build, CreatedDistribution};
use nossis_harness::fixtures::{caller_reference_now, fake_hostname};
use nossis_harness::{with_simulated_backend_settings, BackendSettings, Sandbox};

/// Arguments for the simulate command
pub struct SimulateArgs {
    /// Origin hostname; a fake one when absent
    pub hostname: Option<String>,
    /// Idempotency token; the current time when absent
    pub caller_reference: Option<String>,
    /// Backend settings (JSON format)
    pub settings: Option<String>,
    /// Whether to print the full record
    pub show_record: bool,
}

/// Parse backend settings, falling back to the defaults
pub fn parse_settings(settings: Option<&str>) -> Result<BackendSettings> {
    match settings {
        Some(json) => serde_json::from_str(json).context("Failed to parse backend settings JSON"),
        None => Ok(BackendSettings::default()),
    }
}

/// Create one distribution in a fresh sandbox and backend
pub fn simulate(args: &SimulateArgs, sandbox: &Sandbox) -> Result<CreatedDistribution> {
    let settings = parse_settings(args.settings.as_deref())?;
    let hostname = args
        .hostname
        .clone()
        .unwrap_or_else(|| fake_hostname(&mut rand::thread_rng()));
    let caller_reference = args
        .caller_reference
        .clone()
        .unwrap_or_else(caller_reference_now);
    debug!(%hostname, %caller_reference, "simulating distribution");

    let config = build(&hostname, &caller_reference)
        .context("Failed to build distribution configuration")?;

    let created = with_simulated_backend_settings(sandbox, settings, |client| {
        client.create_distribution(&config)
    })
    .context("Simulated backend rejected the distribution")?;

    Ok(created)
}

/// Execute the simulate command
pub fn execute_simulate_command(args: SimulateArgs) -> Result<()> {
    println!("🧪 Simulating distribution creation...");

    let sandbox = Sandbox::acquire_from_process();
    println!("🔒 Sandbox acquired ({} change(s))", sandbox.actions().len());

    let created = simulate(&args, &sandbox)?;
    let distribution = &created.distribution;

    println!("✅ Distribution created");
    println!("   Id: {}", distribution.id);
    println!("   Status: {}", distribution.status);
    println!("   Domain: {}", distribution.domain_name);
    println!(
        "   Origin: {}",
        distribution
            .distribution_config
            .target_origin()
            .map(|origin| origin.domain_name.as_str())
            .unwrap_or("-")
    );
    println!("   ETag: {}", created.e_tag);
    println!("   Last modified: {}", distribution.last_modified_time.to_rfc3339());

    if args.show_record {
        println!();
        println!("📋 Full record (JSON):");
        println!("{}", serde_json::to_string_pretty(&created)?);
    }

    Ok(())
}
