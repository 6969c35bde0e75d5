//! In-memory secret source.

use super::SecretSource;
use crate::error::Result;
use std::collections::HashMap;

/// Secret source over a fixed in-memory map.
///
/// The simplest real backend: useful for tests, local development, and as a
/// lowest-precedence fallback behind a remote store.
///
/// # Examples
///
/// ```rust
/// use strata_config::secrets::{SecretBackend, StaticSecrets};
///
/// let backend = SecretBackend::new(
///     StaticSecrets::new().with_secret("fish", "goodbye"),
/// );
/// assert_eq!(backend.get_secret("fish").unwrap(), Some("goodbye".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, String>,
}

impl StaticSecrets {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, builder style.
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }

    /// Add or replace a secret.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.secrets.insert(key.into(), value.into());
    }
}

impl SecretSource for StaticSecrets {
    fn fetch(&self, key: &str) -> Result<Option<String>> {
        Ok(self.secrets.get(key).cloned())
    }

    fn name(&self) -> &str {
        "static"
    }
}
