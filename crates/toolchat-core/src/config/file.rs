//! File-based configuration provider
//!
//! Settings live in `config.yaml`, the custom server list in `servers.json`,
//! both under one directory (`~/.config/toolchat` by default).

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::ClientSettings;
use super::traits::{ConfigProvider, ConfigResult};
use crate::logging::file_logger as log;
use crate::registry::ServerDescriptor;

const SETTINGS_FILE: &str = "config.yaml";
const SERVERS_FILE: &str = "servers.json";

/// File-based configuration provider
///
/// # Example
///
/// ```no_run
/// use toolchat_core::config::FileConfigProvider;
///
/// // ~/.config/toolchat
/// let config = FileConfigProvider::user();
///
/// // Explicit directory
/// let config = FileConfigProvider::new("/tmp/toolchat");
/// ```
pub struct FileConfigProvider {
    dir: PathBuf,
    settings_cache: RwLock<Option<ClientSettings>>,
}

impl FileConfigProvider {
    /// Create a provider rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            settings_cache: RwLock::new(None),
        }
    }

    /// User-level config directory (`<config_dir>/toolchat`)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("toolchat"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn servers_path(&self) -> PathBuf {
        self.dir.join(SERVERS_FILE)
    }

    /// Drop cached settings so the next load reads the disk
    pub fn reload(&self) {
        *self.settings_cache.write() = None;
    }

    /// Copy the server file next to itself, if it exists
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        let path = self.servers_path();
        if !path.exists() {
            return Ok(None);
        }

        let backup_path = path.with_extension("json.backup");
        fs::copy(&path, &backup_path)?;
        log::info("FileConfigProvider", &format!("Backed up servers to {}", backup_path.display()));
        Ok(Some(backup_path))
    }

    fn write_file(&self, path: &Path, content: &str) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("dir", &self.dir)
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load_settings(&self) -> ConfigResult<ClientSettings> {
        if let Some(cached) = self.settings_cache.read().as_ref() {
            return Ok(cached.clone());
        }

        let path = self.settings_path();
        let settings = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                ClientSettings::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            log::debug("FileConfigProvider", &format!("No settings at {}, using defaults", path.display()));
            ClientSettings::default()
        };

        *self.settings_cache.write() = Some(settings.clone());
        Ok(settings)
    }

    async fn save_settings(&self, settings: &ClientSettings) -> ConfigResult<()> {
        let content = serde_yaml::to_string(settings)?;
        self.write_file(&self.settings_path(), &content)?;
        *self.settings_cache.write() = Some(settings.clone());
        Ok(())
    }

    async fn load_servers(&self) -> ConfigResult<Vec<ServerDescriptor>> {
        let path = self.servers_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        let servers: Vec<ServerDescriptor> = serde_json::from_str(&content)?;
        log::info(
            "FileConfigProvider",
            &format!("Loaded {} server(s) from {}", servers.len(), path.display()),
        );
        Ok(servers)
    }

    async fn save_servers(&self, servers: &[ServerDescriptor]) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(servers)?;
        self.write_file(&self.servers_path(), &content)?;
        log::info("FileConfigProvider", &format!("Saved {} server(s)", servers.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let config = FileConfigProvider::new(dir.path().join("nested"));

        // Missing file gives defaults
        assert_eq!(config.load_settings().await.unwrap(), ClientSettings::default());

        let settings = ClientSettings::default()
            .with_provider("anthropic")
            .with_dev_mode(true)
            .with_timeout_secs(12);
        config.save_settings(&settings).await.unwrap();

        let content = fs::read_to_string(config.settings_path()).unwrap();
        assert!(content.contains("provider: anthropic"));
        assert!(content.contains("dev_mode: true"));

        let fresh = FileConfigProvider::new(dir.path().join("nested"));
        assert_eq!(fresh.load_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_edits() {
        let dir = tempdir().unwrap();
        let config = FileConfigProvider::new(dir.path());
        assert!(config.load_settings().await.unwrap().provider.is_none());

        fs::write(config.settings_path(), "provider: gemini\n").unwrap();
        // Still cached
        assert!(config.load_settings().await.unwrap().provider.is_none());

        config.reload();
        assert_eq!(config.load_settings().await.unwrap().provider.as_deref(), Some("gemini"));
    }

    #[tokio::test]
    async fn test_servers_round_trip() {
        let dir = tempdir().unwrap();
        let config = FileConfigProvider::new(dir.path());
        assert!(config.load_servers().await.unwrap().is_empty());

        let servers = vec![ServerDescriptor::new("kb", "KB", "docs", "localhost:7000")
            .with_keywords(["handbook"])];
        config.save_servers(&servers).await.unwrap();

        let content = fs::read_to_string(config.servers_path()).unwrap();
        assert!(content.contains("\"baseUrl\""));
        assert_eq!(config.load_servers().await.unwrap(), servers);
    }

    #[tokio::test]
    async fn test_malformed_server_file_is_an_error() {
        let dir = tempdir().unwrap();
        let config = FileConfigProvider::new(dir.path());
        fs::write(config.servers_path(), "not json").unwrap();
        assert!(config.load_servers().await.is_err());
    }

    #[tokio::test]
    async fn test_backup() {
        let dir = tempdir().unwrap();
        let config = FileConfigProvider::new(dir.path());

        assert!(config.backup().unwrap().is_none());

        config.save_servers(&[]).await.unwrap();
        let backup_path = config.backup().unwrap().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().ends_with("servers.json.backup"));
    }
}
