//! Placeholder detection and secret substitution.

use crate::error::Result;
use crate::loaders::Loader;
use crate::secrets::SecretBackend;
use config::{Value, ValueKind};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// One `%%name%%` placeholder token; the identifier never contains `$`.
/// Non-greedy, so adjacent tokens substitute independently.
static SECRET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%[^$]*?%%").expect("placeholder pattern compiles"));

/// Where a key's value comes from, decided once at table-build time.
pub(crate) enum ValueSource {
    /// Default captured by value when the resolution table was built.
    Default(Value),
    /// Winning loader instance, asked fresh on every resolution.
    Loader(Box<dyn Loader>),
}

/// Resolver for one key: produces the raw value and substitutes any
/// `%%name%%` placeholders with secrets from the configured backends.
///
/// Nothing is cached here; every [`resolve`](SecretScanner::resolve) call
/// re-invokes the loader and re-runs substitution.
pub(crate) struct SecretScanner {
    source: ValueSource,
    backends: Arc<Vec<SecretBackend>>,
}

impl SecretScanner {
    pub(crate) fn new(source: ValueSource, backends: Arc<Vec<SecretBackend>>) -> Self {
        Self { source, backends }
    }

    /// Produce the value for this scanner's key.
    ///
    /// String values have each placeholder replaced with the first backend's
    /// secret. A substitution that collapses to the empty string means the
    /// secret was missing everywhere; the original raw value is returned so
    /// the application never silently receives an empty credential.
    pub(crate) fn resolve(&self) -> Result<Value> {
        let raw = match &self.source {
            ValueSource::Default(value) => value.clone(),
            ValueSource::Loader(loader) => loader.get_value()?,
        };

        if self.backends.is_empty() {
            if let ValueKind::String(text) = &raw.kind {
                if SECRET_TOKEN.find(text).is_some_and(|m| m.start() == 0) {
                    warn!(
                        value = %text,
                        "managed-secret style value found, but no secret backends configured"
                    );
                }
            }
            return Ok(raw);
        }

        let ValueKind::String(text) = &raw.kind else {
            // Substitution only applies to strings.
            return Ok(raw);
        };

        let substituted = self.substitute(text)?;
        if substituted.is_empty() {
            warn!(value = %text, "managed secret empty or not found in any backend");
            return Ok(raw);
        }
        Ok(Value::from(substituted))
    }

    fn substitute(&self, input: &str) -> Result<String> {
        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for found in SECRET_TOKEN.find_iter(input) {
            let token = found.as_str();
            out.push_str(&input[last..found.start()]);
            out.push_str(&self.lookup_secret(&token[2..token.len() - 2])?);
            last = found.end();
        }
        out.push_str(&input[last..]);
        Ok(out)
    }

    /// First backend's secret for `name`, or `""` when every backend misses.
    fn lookup_secret(&self, name: &str) -> Result<String> {
        for backend in self.backends.iter() {
            if let Some(secret) = backend.get_secret(name)? {
                return Ok(secret);
            }
        }
        Ok(String::new())
    }
}
