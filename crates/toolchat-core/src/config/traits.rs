//! Configuration provider trait

use async_trait::async_trait;

use super::settings::ClientSettings;
use crate::registry::ServerDescriptor;

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: `config.yaml` + `servers.json` in a config directory
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load client settings, defaults when nothing is stored
    async fn load_settings(&self) -> ConfigResult<ClientSettings>;

    /// Persist client settings
    async fn save_settings(&self, settings: &ClientSettings) -> ConfigResult<()>;

    /// Load the stored custom server list, empty when nothing is stored
    async fn load_servers(&self) -> ConfigResult<Vec<ServerDescriptor>>;

    /// Persist the custom server list
    async fn save_servers(&self, servers: &[ServerDescriptor]) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::registry::RegistryError),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
