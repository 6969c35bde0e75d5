//! In-process runtime configuration store and its loader.
//!
//! [`ConfigStore`] stands in for framework-managed runtime configuration: a
//! namespaced key-value map that application code mutates at runtime while
//! settings engines read through it. Reads are lock-free (`arc-swap`);
//! writes publish a new snapshot.

use super::{Loader, LoaderFactory};
use crate::error::{Result, SettingsError};
use arc_swap::ArcSwap;
use config::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

#[derive(Clone, Default)]
struct StoreState {
    ready: bool,
    namespaces: HashMap<String, HashMap<String, Value>>,
}

/// Cheaply clonable handle to a namespaced runtime configuration store.
///
/// Clones share the same underlying state. Keys inside a namespace are
/// unprefixed; the engine's namespace prefix selects which namespace a
/// [`StoreLoader`] reads.
#[derive(Clone)]
pub struct ConfigStore {
    state: Arc<ArcSwap<StoreState>>,
}

impl ConfigStore {
    /// Create an empty, ready store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(StoreState {
                ready: true,
                namespaces: HashMap::new(),
            })),
        }
    }

    /// Set `key` to `value` within `namespace`.
    pub fn set(&self, namespace: &str, key: &str, value: impl Into<Value>) {
        let value = value.into();
        self.update(|state| {
            state
                .namespaces
                .entry(namespace.to_string())
                .or_default()
                .insert(key.to_string(), value.clone());
        });
    }

    /// Remove `key` from `namespace`, if present.
    pub fn remove(&self, namespace: &str, key: &str) {
        self.update(|state| {
            if let Some(ns) = state.namespaces.get_mut(namespace) {
                ns.remove(key);
            }
        });
    }

    /// Drop every key in `namespace`.
    pub fn clear(&self, namespace: &str) {
        self.update(|state| {
            state.namespaces.remove(namespace);
        });
    }

    /// Mark the store ready or not ready.
    ///
    /// A not-ready store reports every key as absent; see [`StoreLoader`].
    pub fn set_ready(&self, ready: bool) {
        self.update(|state| state.ready = ready);
    }

    fn update(&self, f: impl Fn(&mut StoreState)) {
        self.state.rcu(|current| {
            let mut next = StoreState::clone(current);
            f(&mut next);
            next
        });
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader over one `(namespace, key)` slot of a [`ConfigStore`],
/// constructed by [`StoreLoaderFactory`].
///
/// Values are read from the live store on every call. When the store is not
/// ready, the key is reported absent and a warning is emitted at most once
/// per factory.
pub struct StoreLoader {
    store: ConfigStore,
    namespace: String,
    key: String,
    warned_not_ready: Arc<AtomicBool>,
}

impl Loader for StoreLoader {
    fn has_key(&self) -> Result<bool> {
        let state = self.store.state.load();
        if !state.ready {
            if !self.warned_not_ready.swap(true, Ordering::Relaxed) {
                warn!(
                    namespace = %self.namespace,
                    "configuration store is not ready; its values will not be available"
                );
            }
            return Ok(false);
        }
        Ok(state
            .namespaces
            .get(&self.namespace)
            .is_some_and(|ns| ns.contains_key(&self.key)))
    }

    fn get_value(&self) -> Result<Value> {
        let state = self.store.state.load();
        state
            .namespaces
            .get(&self.namespace)
            .and_then(|ns| ns.get(&self.key))
            .cloned()
            .ok_or_else(|| {
                SettingsError::LoaderFailure(format!(
                    "store no longer holds {}.{}",
                    self.namespace, self.key
                ))
            })
    }
}

/// Factory producing [`StoreLoader`] instances bound to one store.
///
/// The not-ready warning flag lives on the factory, so a store that is slow
/// to come up warns once per engine configuration rather than once per key.
pub struct StoreLoaderFactory {
    store: ConfigStore,
    warned_not_ready: Arc<AtomicBool>,
}

impl StoreLoaderFactory {
    /// Create a factory reading from `store`.
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            warned_not_ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl LoaderFactory for StoreLoaderFactory {
    fn create(&self, prefix: &str, key: &str) -> Result<Box<dyn Loader>> {
        Ok(Box::new(StoreLoader {
            store: self.store.clone(),
            namespace: prefix.to_string(),
            key: key.to_string(),
            warned_not_ready: Arc::clone(&self.warned_not_ready),
        }))
    }
}
