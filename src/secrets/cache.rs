//! Swappable memoization for secret lookups.
//!
//! The engine never caches resolved values; any memoization of secret
//! lookups is owned by the backend that opts into it, through these types.

use super::SecretSource;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Unbounded key→secret memo with an explicit flush.
///
/// Clones share the same storage, so a caller can keep a handle for flushing
/// while the cache itself lives inside a backend. Both hits and not-found
/// results are memoized; errors are not, so a failed lookup is retried on
/// the next access. Thread-safe via an internal mutex; the lock is not held
/// across the underlying fetch, so two concurrent first lookups of the same
/// key may both hit the backing store.
#[derive(Clone, Default)]
pub struct SecretCache {
    entries: Arc<Mutex<HashMap<String, Option<String>>>>,
}

impl SecretCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized result for `key`, calling `fetch` on first use.
    ///
    /// # Errors
    ///
    /// Propagates `fetch` errors without memoizing them.
    pub fn get_or_fetch(
        &self,
        key: &str,
        fetch: impl FnOnce() -> Result<Option<String>>,
    ) -> Result<Option<String>> {
        if let Some(hit) = self.entries.lock().get(key) {
            return Ok(hit.clone());
        }
        let fetched = fetch()?;
        self.entries
            .lock()
            .insert(key.to_string(), fetched.clone());
        Ok(fetched)
    }

    /// Drop every memoized entry.
    pub fn flush(&self) {
        self.entries.lock().clear();
    }
}

/// A [`SecretSource`] wrapper that memoizes lookups in a [`SecretCache`].
///
/// # Examples
///
/// ```rust
/// use strata_config::secrets::{CachedSource, SecretCache, StaticSecrets};
///
/// let cache = SecretCache::new();
/// let source = CachedSource::with_cache(
///     StaticSecrets::new().with_secret("fish", "goodbye"),
///     cache.clone(),
/// );
///
/// // ... hand `source` to a SecretBackend, keep `cache` to flush later ...
/// cache.flush();
/// ```
pub struct CachedSource<S> {
    inner: S,
    cache: SecretCache,
}

impl<S: SecretSource> CachedSource<S> {
    /// Wrap `inner` with a fresh private cache.
    pub fn new(inner: S) -> Self {
        Self::with_cache(inner, SecretCache::new())
    }

    /// Wrap `inner` with a shared cache handle.
    pub fn with_cache(inner: S, cache: SecretCache) -> Self {
        Self { inner, cache }
    }

    /// Handle to the cache, for flushing.
    pub fn cache(&self) -> SecretCache {
        self.cache.clone()
    }
}

impl<S: SecretSource> SecretSource for CachedSource<S> {
    fn fetch(&self, key: &str) -> Result<Option<String>> {
        self.cache.get_or_fetch(key, || self.inner.fetch(key))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
