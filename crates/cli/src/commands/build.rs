//! Build and validate commands
//!
//! `nossis build` prints the distribution configuration for a site as JSON;
//! `nossis validate` checks an existing configuration file against the same
//! rules the backend applies.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use nossis_distribution::{
    ConfigValidator, DistributionConfig, DistributionConfigBuilder, LoggingConfig,
    ValidationReport, ValidatorConfig,
};
use nossis_harness::fixtures::caller_reference_now;

/// Arguments for the build command
pub struct BuildArgs {
    /// Origin hostname
    pub hostname: String,
    /// Idempotency token; the current time when absent
    pub caller_reference: Option<String>,
    pub comment: Option<String>,
    pub error_page: Option<String>,
    pub log_bucket: Option<String>,
    pub log_prefix: Option<String>,
}

/// Assemble the configuration described by `args`
pub fn build_config(args: BuildArgs) -> Result<DistributionConfig> {
    let caller_reference = args.caller_reference.unwrap_or_else(caller_reference_now);
    let mut builder = DistributionConfigBuilder::new(args.hostname, caller_reference);

    if let Some(comment) = args.comment {
        builder = builder.comment(comment);
    }
    if let Some(page) = args.error_page {
        builder = builder.error_page(page);
    }
    if let (Some(bucket), Some(prefix)) = (args.log_bucket, args.log_prefix) {
        builder = builder.logging(LoggingConfig::to_bucket(bucket, prefix));
    }

    builder.build().context("Failed to build distribution configuration")
}

/// Execute the build command
pub fn execute_build_command(args: BuildArgs) -> Result<()> {
    let config = build_config(args)?;
    println!("{}", config.to_json()?);
    Ok(())
}

/// Parse and validate a configuration file
pub fn check_config_file(path: &str, strict: bool) -> Result<ValidationReport> {
    let path = Path::new(path);
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let config = DistributionConfig::from_json(&json)
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

    let validator = ConfigValidator::with_config(ValidatorConfig {
        strict_logging: strict,
        ..Default::default()
    });
    Ok(validator.validate(&config))
}

/// Validate a configuration file and report the outcome
pub fn validate_config_file(path: &str, strict: bool) -> Result<()> {
    println!("🔍 Validating configuration: {}", path);

    let report = check_config_file(path, strict)?;

    if report.is_valid {
        println!("✅ Configuration validation passed");
        if !report.warnings.is_empty() {
            println!("⚠️  Warnings:");
            for warning in &report.warnings {
                println!("   - {}", warning);
            }
        }
    } else {
        println!("❌ Configuration validation failed");
        for violation in &report.violations {
            println!("   {}: {}", violation.code(), violation);
        }
        anyhow::bail!("Configuration validation failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(hostname: &str) -> BuildArgs {
        BuildArgs {
            hostname: hostname.to_string(),
            caller_reference: Some("ref-1".to_string()),
            comment: None,
            error_page: None,
            log_bucket: None,
            log_prefix: None,
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(args("example.org")).unwrap();

        assert_eq!(config.caller_reference, "ref-1");
        assert_eq!(config.origins.items()[0].domain_name, "example.org");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_build_config_with_logging() {
        let config = build_config(BuildArgs {
            log_bucket: Some("logs.example.org".to_string()),
            log_prefix: Some("site/".to_string()),
            ..args("example.org")
        })
        .unwrap();

        assert!(config.logging.enabled);
        assert_eq!(config.logging.prefix, "site/");
    }

    #[test]
    fn test_build_config_empty_hostname() {
        assert!(build_config(args("")).is_err());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        assert!(validate_config_file("nonexistent.json", false).is_err());
    }

    #[test]
    fn test_validate_written_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("distribution.json");

        let mut config = build_config(args("example.org")).unwrap();
        fs::write(&path, config.to_json().unwrap()).unwrap();
        let path_str = path.to_string_lossy().to_string();
        assert!(validate_config_file(&path_str, false).is_ok());

        config.default_cache_behavior.target_origin_id = "missing".to_string();
        fs::write(&path, config.to_json().unwrap()).unwrap();
        let report = check_config_file(&path_str, false).unwrap();
        assert!(!report.is_valid);
        assert!(validate_config_file(&path_str, false).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_quantity() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("distribution.json");

        let config = build_config(args("example.org")).unwrap();
        let json = config
            .to_json()
            .unwrap()
            .replacen("\"Quantity\": 11", "\"Quantity\": 12", 1);
        fs::write(&path, json).unwrap();

        let result = check_config_file(&path.to_string_lossy(), false);
        assert!(result.is_err());
    }
}
