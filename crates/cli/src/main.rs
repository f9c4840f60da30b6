use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{
    execute_build_command, execute_simulate_command, validate_config_file, BuildArgs,
    SimulateArgs,
};

#[derive(Parser)]
#[command(name = "nossis")]
#[command(about = "Nossis - serverless hosting for static, private web sites")]
#[command(version = nossis_distribution::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the distribution configuration for a site
    Build(BuildCommandArgs),
    /// Check a distribution configuration file
    Validate(ValidateArgs),
    /// Create a distribution against the in-memory backend
    Simulate(SimulateCommandArgs),
}

#[derive(Args)]
pub struct BuildCommandArgs {
    /// Hostname of the origin serving the site
    pub hostname: String,
    /// Idempotency token (defaults to the current time)
    #[arg(long)]
    pub caller_reference: Option<String>,
    /// Distribution comment
    #[arg(long)]
    pub comment: Option<String>,
    /// Page served for origin errors
    #[arg(long)]
    pub error_page: Option<String>,
    /// Write access logs to this bucket
    #[arg(long, requires = "log_prefix")]
    pub log_bucket: Option<String>,
    /// Key prefix for access logs
    #[arg(long, requires = "log_bucket")]
    pub log_prefix: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON distribution configuration
    pub config: String,
    /// Treat ignored logging fields as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct SimulateCommandArgs {
    /// Origin hostname (a fake one is generated when omitted)
    #[arg(long)]
    pub hostname: Option<String>,
    /// Idempotency token (defaults to the current time)
    #[arg(long)]
    pub caller_reference: Option<String>,
    /// Backend settings (JSON format)
    #[arg(long)]
    pub settings: Option<String>,
    /// Show the full created-distribution record
    #[arg(long)]
    pub show_record: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nossis_distribution=info,nossis_harness=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Build(args) => execute_build_command(BuildArgs {
            hostname: args.hostname,
            caller_reference: args.caller_reference,
            comment: args.comment,
            error_page: args.error_page,
            log_bucket: args.log_bucket,
            log_prefix: args.log_prefix,
        }),
        Commands::Validate(args) => validate_config_file(&args.config, args.strict),
        Commands::Simulate(args) => execute_simulate_command(SimulateArgs {
            hostname: args.hostname,
            caller_reference: args.caller_reference,
            settings: args.settings,
            show_record: args.show_record,
        }),
    }
}
