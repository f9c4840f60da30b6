//! Credential Sandbox Module
//!
//! A sandbox takes a snapshot of the ambient environment and neutralises
//! everything that could steer a client toward real infrastructure: each
//! credential variable gets a random value that cannot be a real key, the
//! profile selector is removed, and the nonexistent-region toggle is set so
//! the random region is accepted by the simulated backend.
//!
//! The process environment itself is never touched. Backends receive the
//! rewritten variables through a [`ClientContext`].
//!
//! Blocking outbound network access is the caller's job and must already be
//! in place before a sandbox is acquired.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::environment::{Environment, ALLOW_NONEXISTENT_REGION, CREDENTIAL_VARIABLES, PROFILE};

/// Length of every generated credential value
pub const RANDOM_VALUE_LEN: usize = 8;

const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One change a sandbox made to its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxAction {
    /// Variable replaced with a random value
    Overwritten { variable: String, was_set: bool },
    /// Variable deleted
    Removed { variable: String },
    /// Variable set to a fixed value
    Set { variable: String, value: String },
}

/// An environment with all credential material replaced
#[derive(Debug, Clone)]
pub struct Sandbox {
    environment: Environment,
    actions: Vec<SandboxAction>,
    acquired_at: DateTime<Utc>,
}

impl Sandbox {
    /// Sandbox a snapshot of `ambient`
    pub fn acquire(ambient: &Environment) -> Self {
        Self::acquire_with_rng(ambient, &mut rand::thread_rng())
    }

    /// Sandbox a snapshot of the current process environment
    pub fn acquire_from_process() -> Self {
        Self::acquire(&Environment::from_process())
    }

    /// Like [`Sandbox::acquire`], drawing random values from `rng`
    pub fn acquire_with_rng<R: Rng + ?Sized>(ambient: &Environment, rng: &mut R) -> Self {
        let mut environment = ambient.clone();
        let mut actions = Vec::new();

        // New values must not collide with any credential value seen before.
        let previous: Vec<&str> = CREDENTIAL_VARIABLES
            .iter()
            .filter_map(|variable| ambient.get(variable))
            .collect();

        for variable in CREDENTIAL_VARIABLES {
            let value = random_value_unlike(rng, &previous);
            environment.set(variable, value);
            actions.push(SandboxAction::Overwritten {
                variable: variable.to_string(),
                was_set: ambient.contains(variable),
            });
        }

        // A nonsense profile name would make credential resolution try to
        // load it and fail, so the selector is deleted instead.
        if environment.remove(PROFILE).is_some() {
            actions.push(SandboxAction::Removed {
                variable: PROFILE.to_string(),
            });
        }

        environment.set(ALLOW_NONEXISTENT_REGION, "True");
        actions.push(SandboxAction::Set {
            variable: ALLOW_NONEXISTENT_REGION.to_string(),
            value: "True".to_string(),
        });

        debug!(changes = actions.len(), "sandbox acquired");

        Self {
            environment,
            actions,
            acquired_at: Utc::now(),
        }
    }

    /// The rewritten environment
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Changes made relative to the ambient environment, in order
    pub fn actions(&self) -> &[SandboxAction] {
        &self.actions
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Context handed to backends started inside this sandbox
    pub fn context(&self) -> ClientContext {
        ClientContext {
            environment: self.environment.clone(),
            sandboxed: true,
        }
    }
}

/// Configuration a backend client is constructed from
#[derive(Debug, Clone)]
pub struct ClientContext {
    environment: Environment,
    sandboxed: bool,
}

impl ClientContext {
    /// Context built straight from an environment, without sandboxing.
    /// Simulated backends refuse these.
    pub fn from_environment(environment: Environment) -> Self {
        Self {
            environment,
            sandboxed: false,
        }
    }

    /// Replace one variable, keeping the context's provenance
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.set(key, value);
        self
    }

    pub fn is_sandboxed(&self) -> bool {
        self.sandboxed
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn region(&self) -> Option<&str> {
        self.environment.region()
    }
}

/// Random letters, guaranteed to differ from every value in `previous`
fn random_value_unlike<R: Rng + ?Sized>(rng: &mut R, previous: &[&str]) -> String {
    loop {
        let value: String = ASCII_LETTERS
            .choose_multiple(rng, RANDOM_VALUE_LEN)
            .map(|&b| b as char)
            .collect();
        if !previous.contains(&value.as_str()) {
            return value;
        }
    }
}
