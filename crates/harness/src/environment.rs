//! Environment snapshots.
//!
//! Credential resolution reads a handful of process variables. Rather than
//! mutating the real process environment, the harness works on an owned
//! [`Environment`] value that is captured once and then rewritten by the
//! sandbox.

use std::collections::BTreeMap;

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const REGION: &str = "AWS_REGION";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const SECURITY_TOKEN: &str = "AWS_SECURITY_TOKEN";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Variables that can carry real credentials or pick a real region
pub const CREDENTIAL_VARIABLES: [&str; 6] = [
    ACCESS_KEY_ID,
    DEFAULT_REGION,
    REGION,
    SECRET_ACCESS_KEY,
    SECURITY_TOKEN,
    SESSION_TOKEN,
];

/// Selects a named credentials profile; must be absent, not overwritten
pub const PROFILE: &str = "AWS_PROFILE";

/// Lets the simulated backend accept region names it does not know
pub const ALLOW_NONEXISTENT_REGION: &str = "MOTO_ALLOW_NONEXISTENT_REGION";

/// An owned set of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment. Variables that are not
    /// valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Region in effect; `AWS_REGION` wins over `AWS_DEFAULT_REGION`
    pub fn region(&self) -> Option<&str> {
        self.get(REGION).or_else(|| self.get(DEFAULT_REGION))
    }

    /// Whether the nonexistent-region toggle is on
    pub fn allows_nonexistent_region(&self) -> bool {
        self.get(ALLOW_NONEXISTENT_REGION)
            .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
