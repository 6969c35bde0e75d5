//! Environment variable loader.

use super::{Loader, LoaderFactory, flat_key};
use crate::error::{Result, SettingsError};
use config::Value;
use std::env;

/// Loader reading one flattened key from the process environment.
///
/// For prefix `APP` and key `DATABASE_URL` the variable consulted is
/// `APP_DATABASE_URL`. The variable is re-read on every [`Loader::get_value`]
/// call, so changes to the environment are observed live.
pub struct EnvLoader {
    flat_key: String,
}

impl EnvLoader {
    /// Create a loader for `(prefix, key)`.
    pub fn new(prefix: &str, key: &str) -> Self {
        Self {
            flat_key: flat_key(prefix, key),
        }
    }
}

impl Loader for EnvLoader {
    fn has_key(&self) -> Result<bool> {
        Ok(env::var_os(&self.flat_key).is_some())
    }

    fn get_value(&self) -> Result<Value> {
        match env::var(&self.flat_key) {
            Ok(raw) => Ok(Value::from(raw)),
            // has_key said true earlier; a vanished or non-unicode variable
            // is a contract violation by the environment, not absence.
            Err(err) => Err(SettingsError::LoaderFailure(format!(
                "environment variable {} unreadable: {}",
                self.flat_key, err
            ))),
        }
    }
}

/// Factory producing [`EnvLoader`] instances.
#[derive(Debug, Default)]
pub struct EnvLoaderFactory;

impl EnvLoaderFactory {
    /// Create a new environment loader factory.
    pub fn new() -> Self {
        Self
    }
}

impl LoaderFactory for EnvLoaderFactory {
    fn create(&self, prefix: &str, key: &str) -> Result<Box<dyn Loader>> {
        Ok(Box::new(EnvLoader::new(prefix, key)))
    }
}
