//! # strata-config
//!
//! Layered application settings with ordered loader precedence and pluggable
//! secret substitution.
//!
//! ## Overview
//!
//! `strata-config` resolves settings values from an ordered list of loader
//! backends (earlier loaders win), falling back to caller-supplied defaults,
//! and transparently replaces `%%name%%` placeholder tokens in resolved
//! string values with secrets fetched from pluggable secret backends:
//!
//! - One typed [`settings::Settings`] engine per logical namespace
//! - Override by environment, runtime config store, or code defaults
//! - Late secret substitution, independent of which layer produced the
//!   placeholder
//! - No engine-level caching: every access re-reads the winning loader, so
//!   runtime changes are observed live
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_config::prelude::*;
//! use strata_config::secrets::StaticSecrets;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::new();
//! store.set("APP", "DB_PASSWORD", "%%db-password%%");
//!
//! let settings = Settings::builder(
//!     [("DB_PASSWORD", "dev-only"), ("POOL_SIZE", "4")],
//!     "APP",
//! )
//! .with_loader(StoreLoaderFactory::new(store.clone()))
//! .with_loader(EnvLoaderFactory::new())
//! .with_secret_backend(SecretBackend::new(
//!     StaticSecrets::new().with_secret("db-password", "hunter2"),
//! ))
//! .build();
//!
//! // The store wins DB_PASSWORD and its placeholder is substituted.
//! assert_eq!(settings.get("DB_PASSWORD")?.into_string()?, "hunter2");
//! // No loader holds POOL_SIZE, so the default is returned.
//! assert_eq!(settings.get("POOL_SIZE")?.into_string()?, "4");
//! # Ok(())
//! # }
//! ```
//!
//! ## Precedence
//!
//! Loaders are listed in precedence order; for every key the first loader
//! reporting the key present wins, decided once per configuration epoch.
//! Values themselves are never cached; each access re-invokes the winning
//! loader and re-runs secret substitution, so a store write or environment
//! change shows up on the next read.
//!
//! ## Secrets
//!
//! A resolved string containing `%%name%%` tokens has each token replaced
//! with the first configured backend's secret for `name`. Missing secrets
//! fall back to the raw value (with a warning) rather than handing the
//! application an empty credential. Per-backend error handling is governed
//! by two flags on [`secrets::SecretBackend`]; lookup memoization is opt-in
//! via [`secrets::CachedSource`].

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod error;
pub mod loaders;
pub mod secrets;
pub mod settings;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::error::{Result, SettingsError};
    pub use crate::loaders::{ConfigStore, EnvLoaderFactory, LoaderFactory, StoreLoaderFactory};
    pub use crate::secrets::{SecretBackend, SecretSource};
    pub use crate::settings::{Settings, SettingsBuilder};
}
