//! Nossis simulated backend harness
//!
//! Everything needed to exercise distribution configurations without real
//! infrastructure: a credential sandbox, an in-memory distribution backend
//! and a client handle scoped to that backend.
//!
//! ```no_run
//! use nossis_harness::{fixtures, with_simulated_backend, Sandbox};
//!
//! let sandbox = Sandbox::acquire_from_process();
//! let created = with_simulated_backend(&sandbox, |client| fixtures::distribution(client))?;
//! assert!(!created.distribution.id.is_empty());
//! # Ok::<(), nossis_harness::HarnessError>(())
//! ```

pub mod backend;
pub mod client;
pub mod environment;
pub mod errors;
pub mod fixtures;
pub mod sandbox;

pub use backend::{BackendSettings, DistributionBackend, SimulatedBackend};
pub use client::ClientHandle;
pub use environment::Environment;
pub use errors::{BackendError, HarnessError, ValidationError};
pub use sandbox::{ClientContext, Sandbox, SandboxAction};

/// Start a simulated backend inside `sandbox`, run `f` against it and tear
/// the backend down afterwards, whether `f` succeeds or not.
pub fn with_simulated_backend<T, F>(sandbox: &Sandbox, f: F) -> Result<T, HarnessError>
where
    F: FnOnce(&ClientHandle<'_>) -> Result<T, HarnessError>,
{
    with_simulated_backend_settings(sandbox, BackendSettings::default(), f)
}

/// [`with_simulated_backend`] with explicit backend settings
pub fn with_simulated_backend_settings<T, F>(
    sandbox: &Sandbox,
    settings: BackendSettings,
    f: F,
) -> Result<T, HarnessError>
where
    F: FnOnce(&ClientHandle<'_>) -> Result<T, HarnessError>,
{
    let backend = SimulatedBackend::start_with_settings(&sandbox.context(), settings)?;
    let client = backend.client();
    f(&client)
}
