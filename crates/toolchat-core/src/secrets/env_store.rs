//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};
use crate::logging::file_logger as log;

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("claude", vec!["ANTHROPIC_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("mock", vec![]);
    m
});

/// Read-only secret store backed by the process environment
///
/// Provider names map to their conventional variables:
/// - `anthropic` → `ANTHROPIC_API_KEY`
/// - `gemini` → `GEMINI_API_KEY` or `GOOGLE_API_KEY`
///
/// Any other key is looked up verbatim, then as `<KEY>_API_KEY`.
///
/// # Example
///
/// ```
/// use toolchat_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
/// let _gemini = store.get("gemini");
/// ```
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a provider
    pub fn env_vars_for_provider(provider: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(provider.to_lowercase().as_str()).map(|v| v.as_slice())
    }

    fn read(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = Self::read(key) {
            log::debug("EnvSecretStore", &format!("found '{}' directly", key));
            return Some(value);
        }

        if let Some(vars) = Self::env_vars_for_provider(key) {
            for var in vars {
                if let Some(value) = Self::read(var) {
                    log::debug("EnvSecretStore", &format!("resolved '{}' via {}", key, var));
                    return Some(value);
                }
            }
        }

        let auto_key = format!("{}_API_KEY", key.to_uppercase());
        let value = Self::read(&auto_key);
        if value.is_none() {
            log::debug("EnvSecretStore", &format!("no value for '{}'", key));
        }
        value
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }

    fn delete(&self, _key: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}
