//! Error types for strata-config.

/// Result type alias for strata-config operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A key was requested that is not part of the defaults map.
    #[error("No setting {0}")]
    UnknownSetting(String),

    /// A loader failed while probing for or producing a value.
    ///
    /// Loader errors are always surfaced to the caller; the engine never
    /// falls back to the default value on loader failure. Only "key not
    /// present" selects the default.
    #[error("Loader failure: {0}")]
    LoaderFailure(String),

    /// A secret backend failed while fetching a secret.
    ///
    /// Whether this variant reaches the caller is governed by the backend's
    /// `fail_on_error` flag; see [`crate::secrets::SecretBackend`].
    #[error("Secret backend failure: {0}")]
    SecretBackendFailure(String),

    /// A resolved setting was rejected by a validation predicate.
    #[error("{key}={value} not supported")]
    ImproperlyConfigured {
        /// The setting key that failed validation.
        key: String,
        /// Display rendering of the rejected value.
        value: String,
    },
}
