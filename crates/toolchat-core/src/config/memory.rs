//! In-memory configuration provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::ClientSettings;
use super::traits::{ConfigProvider, ConfigResult};
use crate::registry::ServerDescriptor;

/// In-memory configuration provider for testing
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    settings: RwLock<ClientSettings>,
    servers: RwLock<Vec<ServerDescriptor>>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ClientSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            servers: RwLock::new(Vec::new()),
        }
    }

    pub fn with_servers(self, servers: Vec<ServerDescriptor>) -> Self {
        *self.servers.write() = servers;
        self
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load_settings(&self) -> ConfigResult<ClientSettings> {
        Ok(self.settings.read().clone())
    }

    async fn save_settings(&self, settings: &ClientSettings) -> ConfigResult<()> {
        *self.settings.write() = settings.clone();
        Ok(())
    }

    async fn load_servers(&self) -> ConfigResult<Vec<ServerDescriptor>> {
        Ok(self.servers.read().clone())
    }

    async fn save_servers(&self, servers: &[ServerDescriptor]) -> ConfigResult<()> {
        *self.servers.write() = servers.to_vec();
        Ok(())
    }
}
