//! Configuration provider abstractions
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory for testing
//! - `FileConfigProvider`: YAML settings plus a JSON server list on disk

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigError, ConfigProvider, ConfigResult};
pub use settings::{
    ClientSettings, DEFAULT_ANTHROPIC_MODEL, DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use memory::MemoryConfigProvider;
pub use file::FileConfigProvider;

use crate::registry::ServerRegistry;

/// Replace the registry's custom servers with the stored list
///
/// Returns the number of servers applied. A malformed store leaves the
/// registry untouched.
pub async fn apply_servers_to_registry(
    config: &dyn ConfigProvider,
    registry: &ServerRegistry,
) -> ConfigResult<usize> {
    let servers = config.load_servers().await?;
    let json = serde_json::to_string(&servers)?;
    Ok(registry.import_all(&json)?)
}

/// Write the registry's custom servers to the store
pub async fn persist_custom_servers(
    config: &dyn ConfigProvider,
    registry: &ServerRegistry,
) -> ConfigResult<usize> {
    let exported = registry.export_custom()?;
    let servers: Vec<crate::registry::ServerDescriptor> = serde_json::from_str(&exported)?;
    config.save_servers(&servers).await?;
    Ok(servers.len())
}
