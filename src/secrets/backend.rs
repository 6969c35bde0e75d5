//! Secret source trait and the uniform error-policy wrapper.

use crate::error::Result;
use tracing::error;

/// Backend-specific secret fetch.
///
/// Implement this trait to plug a secret store (a vault, a cloud secret
/// manager, an encrypted file) into the engine. `Ok(None)` means "not
/// found"; reserve `Err` for genuine failures, typically
/// [`crate::error::SettingsError::SecretBackendFailure`].
pub trait SecretSource: Send + Sync {
    /// Fetch the secret stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails. How that error is
    /// handled is decided by the [`SecretBackend`] wrapping this source.
    fn fetch(&self, key: &str) -> Result<Option<String>>;

    /// Human-readable backend name, used when logging lookup failures.
    fn name(&self) -> &str;
}

/// A [`SecretSource`] wrapped in the uniform error-handling policy.
///
/// Two independent flags govern what happens when the source errors:
///
/// - `ignore_errors` (default `false`): when unset, the error is logged
///   (backend name plus error) once per call.
/// - `fail_on_error` (default `true`): when set, the error propagates to the
///   caller; when unset, it is swallowed and the lookup reports "not found".
///
/// All four combinations are valid.
pub struct SecretBackend {
    source: Box<dyn SecretSource>,
    ignore_errors: bool,
    fail_on_error: bool,
}

impl SecretBackend {
    /// Wrap `source` with the default policy: log errors and propagate them.
    pub fn new(source: impl SecretSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            ignore_errors: false,
            fail_on_error: true,
        }
    }

    /// Suppress logging of source errors.
    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Control whether source errors propagate (`true`, the default) or are
    /// swallowed and reported as "not found".
    pub fn with_fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Fetch `key` from the wrapped source, applying the error policy.
    ///
    /// # Errors
    ///
    /// Propagates source errors only when `fail_on_error` is set.
    pub fn get_secret(&self, key: &str) -> Result<Option<String>> {
        match self.source.fetch(key) {
            Ok(found) => Ok(found),
            Err(err) => {
                if !self.ignore_errors {
                    error!(backend = self.source.name(), %err, "secret lookup failed");
                }
                if self.fail_on_error {
                    Err(err)
                } else {
                    Ok(None)
                }
            }
        }
    }
}
