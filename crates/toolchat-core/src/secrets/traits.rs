//! Core traits and types for credential storage

use thiserror::Error;

/// Information about a secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretInfo {
    /// Whether the secret exists
    pub available: bool,
    /// Which store provided the secret
    pub source: String,
}

impl SecretInfo {
    pub fn new(available: bool, source: impl Into<String>) -> Self {
        Self {
            available,
            source: source.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            available: false,
            source: "none".to_string(),
        }
    }
}

/// Errors that can occur during secret store operations
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("Store is read-only")]
    ReadOnly,

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Other(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Trait for credential storage implementations
///
/// Keys are either provider names (`"gemini"`, `"anthropic"`) that a store
/// may map to its own naming scheme, or direct names such as
/// `GEMINI_API_KEY`.
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a secret by key
    fn get(&self, key: &str) -> Option<String>;

    /// Store a secret
    ///
    /// Returns `Err(SecretStoreError::ReadOnly)` if the store doesn't support writing.
    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()>;

    /// Delete a secret
    fn delete(&self, key: &str) -> SecretStoreResult<()>;

    /// Check if a usable secret exists
    ///
    /// Placeholder values copied from a template do not count.
    fn has(&self, key: &str) -> bool {
        self.get(key)
            .map(|value| !is_placeholder_credential(&value))
            .unwrap_or(false)
    }

    /// Get information about a secret
    fn get_info(&self, key: &str) -> SecretInfo {
        if self.has(key) {
            SecretInfo::new(true, self.name())
        } else {
            SecretInfo::not_found()
        }
    }
}

/// True for empty keys and template placeholders like `your-gemini-api-key-here`
pub fn is_placeholder_credential(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_lowercase();
    lower.starts_with("your-") && lower.ends_with("-here")
}
