//! CLI command modules

pub mod build;
pub mod simulate;

pub use build::{execute_build_command, validate_config_file, BuildArgs};
pub use simulate::{execute_simulate_command, SimulateArgs};
