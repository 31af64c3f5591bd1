//! Credential lookup for LLM providers
//!
//! - `SecretStore` trait for pluggable stores
//! - `EnvSecretStore`: read-only, backed by environment variables
//! - `MemorySecretStore`: read-write, in memory

mod traits;
mod env_store;
mod memory_store;

pub use traits::{is_placeholder_credential, SecretInfo, SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
