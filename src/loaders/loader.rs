//! Loader capability traits.

use crate::error::Result;
use config::Value;

/// A configuration loader bound to one `(prefix, key)` pair.
///
/// Implement this trait together with [`LoaderFactory`] to plug a custom
/// value source (a database row, a remote key-value store, a framework
/// settings namespace) into [`crate::settings::Settings`].
///
/// # Contract
///
/// - `has_key` is probed exactly once per key when the resolution table is
///   built. It must be side-effect-free, and absence is `Ok(false)`, never
///   an error. A loader that cannot determine presence (its backing store is
///   not ready yet) should warn at most once and report `Ok(false)`.
/// - `get_value` is only invoked after `has_key` returned `true` on the same
///   instance. It may be invoked many times over the instance's lifetime and
///   must return the live current value, not one captured at construction.
pub trait Loader: Send + Sync {
    /// Report whether this loader currently holds a value for its key.
    fn has_key(&self) -> Result<bool>;

    /// Produce the live value for this loader's key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails; errors propagate to the
    /// [`crate::settings::Settings::get`] caller unaltered.
    fn get_value(&self) -> Result<Value>;
}

/// Constructs [`Loader`] instances for `(prefix, key)` pairs.
///
/// Factories are listed on the engine in precedence order; the first factory
/// whose loader reports `has_key() == true` wins the key.
pub trait LoaderFactory: Send + Sync {
    /// Build a loader bound to `(prefix, key)`.
    ///
    /// # Errors
    ///
    /// Construction failures propagate to the caller of
    /// [`crate::settings::Settings::get`] and abort table construction.
    fn create(&self, prefix: &str, key: &str) -> Result<Box<dyn Loader>>;
}

/// Flattened lookup key used by loaders reading a flat keyspace.
pub fn flat_key(prefix: &str, key: &str) -> String {
    format!("{prefix}_{key}")
}
