//! Secret backend capability and first-party implementations.

mod backend;
mod cache;
mod memory;

pub use backend::{SecretBackend, SecretSource};
pub use cache::{CachedSource, SecretCache};
pub use memory::StaticSecrets;
