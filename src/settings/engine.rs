//! The settings engine: precedence resolution over layered loaders.

use super::scanner::{SecretScanner, ValueSource};
use crate::error::{Result, SettingsError};
use crate::loaders::LoaderFactory;
use crate::secrets::SecretBackend;
use config::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything `reconfigure` swaps, guarded by one lock so a reader never
/// observes a torn configuration.
struct Inner {
    loaders: Vec<Arc<dyn LoaderFactory>>,
    backends: Arc<Vec<SecretBackend>>,
    lookups: HashMap<String, SecretScanner>,
    initialized: bool,
}

/// Layered settings resolution over an ordered list of loaders.
///
/// A `Settings` engine owns a map of key→default and a namespace prefix.
/// On first access it builds a resolution table: for every key, the first
/// loader (in list order) that reports the key present wins; otherwise the
/// default value is captured. Each subsequent access re-invokes the winning
/// loader and re-runs secret substitution: the engine caches which loader
/// won, never the value itself.
///
/// # Examples
///
/// ```rust
/// use strata_config::prelude::*;
///
/// let store = ConfigStore::new();
/// store.set("APP", "GREETING", "hello");
///
/// let settings = Settings::builder([("GREETING", "default"), ("RETRIES", "3")], "APP")
///     .with_loader(StoreLoaderFactory::new(store.clone()))
///     .with_loader(EnvLoaderFactory::new())
///     .build();
///
/// assert_eq!(settings.get("GREETING").unwrap().into_string().unwrap(), "hello");
/// assert_eq!(settings.get("RETRIES").unwrap().into_string().unwrap(), "3");
/// ```
pub struct Settings {
    defaults: IndexMap<String, Value>,
    prefix: String,
    inner: RwLock<Inner>,
}

impl Settings {
    /// Create an engine from defaults, a namespace prefix, and ordered
    /// loader and secret-backend lists (either may be empty).
    pub fn new<K, V, D>(
        defaults: D,
        prefix: impl Into<String>,
        loaders: Vec<Arc<dyn LoaderFactory>>,
        secret_backends: Vec<SecretBackend>,
    ) -> Self
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
            inner: RwLock::new(Inner {
                loaders,
                backends: Arc::new(secret_backends),
                lookups: HashMap::new(),
                initialized: false,
            }),
        }
    }

    /// Replace the loader list and/or the secret-backend list.
    ///
    /// `None` leaves the corresponding list unchanged, so callers can swap
    /// secret backends while keeping loaders, or vice versa. The resolution
    /// table is always invalidated and lazily rebuilt on the next access.
    pub fn reconfigure(
        &self,
        loaders: Option<Vec<Arc<dyn LoaderFactory>>>,
        secret_backends: Option<Vec<SecretBackend>>,
    ) {
        let mut inner = self.inner.write();
        if let Some(loaders) = loaders {
            inner.loaders = loaders;
        }
        if let Some(backends) = secret_backends {
            inner.backends = Arc::new(backends);
        }
        inner.lookups.clear();
        inner.initialized = false;
    }

    /// Resolve the value for `name`.
    ///
    /// Builds the resolution table on first access (or after a
    /// [`reconfigure`](Settings::reconfigure)), then re-invokes the key's
    /// bound loader and re-runs secret substitution.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownSetting`] when `name` is not a defaults key.
    /// - Loader and secret-backend errors propagate unaltered.
    pub fn get(&self, name: &str) -> Result<Value> {
        loop {
            {
                let inner = self.inner.read();
                if inner.initialized {
                    return match inner.lookups.get(name) {
                        Some(scanner) => scanner.resolve(),
                        None => Err(SettingsError::UnknownSetting(name.to_string())),
                    };
                }
            }
            // Table missing (first access, or a reconfigure raced us).
            self.initialize()?;
        }
    }

    /// The configured setting keys, in defaults declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.defaults.keys().cloned().collect()
    }

    /// Build the resolution table, double-checked under the write lock.
    ///
    /// The table is committed only when every key resolved a source; a
    /// loader error propagates and leaves the engine uninitialized so the
    /// next access retries from scratch.
    fn initialize(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.initialized {
            return Ok(());
        }

        let mut lookups = HashMap::with_capacity(self.defaults.len());
        for (key, default) in &self.defaults {
            let mut winner = None;
            for factory in &inner.loaders {
                let loader = factory.create(&self.prefix, key)?;
                if loader.has_key()? {
                    winner = Some(loader);
                    break;
                }
            }

            let source = match winner {
                Some(loader) => ValueSource::Loader(loader),
                None => ValueSource::Default(default.clone()),
            };
            lookups.insert(
                key.clone(),
                SecretScanner::new(source, Arc::clone(&inner.backends)),
            );
        }

        inner.lookups = lookups;
        inner.initialized = true;
        Ok(())
    }
}
