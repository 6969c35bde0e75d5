//! Builder for constructing Settings engines.

use super::Settings;
use crate::loaders::LoaderFactory;
use crate::secrets::SecretBackend;
use config::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Fluent builder for a [`Settings`] engine.
///
/// Loaders are added in precedence order (first added wins); secret backends
/// are added in lookup order.
///
/// # Examples
///
/// ```rust
/// use strata_config::prelude::*;
/// use strata_config::secrets::StaticSecrets;
///
/// let settings = Settings::builder([("TOKEN", "%%api-token%%")], "APP")
///     .with_loader(EnvLoaderFactory::new())
///     .with_secret_backend(SecretBackend::new(
///         StaticSecrets::new().with_secret("api-token", "s3cr3t"),
///     ))
///     .build();
///
/// assert_eq!(settings.get("TOKEN").unwrap().into_string().unwrap(), "s3cr3t");
/// ```
pub struct SettingsBuilder {
    defaults: IndexMap<String, Value>,
    prefix: String,
    loaders: Vec<Arc<dyn LoaderFactory>>,
    secret_backends: Vec<SecretBackend>,
}

impl SettingsBuilder {
    /// Start a builder from defaults and a namespace prefix.
    pub fn new<K, V, D>(defaults: D, prefix: impl Into<String>) -> Self
    where
        D: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            defaults: defaults
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            prefix: prefix.into(),
            loaders: Vec::new(),
            secret_backends: Vec::new(),
        }
    }

    /// Append a loader factory; earlier loaders take precedence.
    pub fn with_loader(mut self, factory: impl LoaderFactory + 'static) -> Self {
        self.loaders.push(Arc::new(factory));
        self
    }

    /// Append a secret backend; earlier backends are consulted first.
    pub fn with_secret_backend(mut self, backend: SecretBackend) -> Self {
        self.secret_backends.push(backend);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Settings {
        Settings::new(
            self.defaults,
            self.prefix,
            self.loaders,
            self.secret_backends,
        )
    }
}

impl Settings {
    /// Create a builder for a [`Settings`] engine.
    pub fn builder<K, V, D>(defaults: D, prefix: impl Into<String>) -> SettingsBuilder
    where
        D: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        SettingsBuilder::new(defaults, prefix)
    }
}
