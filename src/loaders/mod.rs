//! Loader capability traits and first-party loader implementations.

mod env;
mod loader;
mod store;

pub use env::{EnvLoader, EnvLoaderFactory};
pub use loader::{Loader, LoaderFactory, flat_key};
pub use store::{ConfigStore, StoreLoader, StoreLoaderFactory};
