//! Tool server registry
//!
//! Holds the built-in tool servers plus user-added ("custom") ones and
//! decides which server, if any, a chat message should be routed to.
//!
//! ```rust,ignore
//! use toolchat_core::registry::ServerRegistry;
//!
//! let registry = ServerRegistry::new(logger);
//! registry.import_all(&std::fs::read_to_string("servers.json")?)?;
//!
//! if let Some(server) = registry.match_message("今日の天気は？") {
//!     println!("routing to {}", server.name);
//! }
//! ```

mod descriptor;
mod routing;

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::logging::Logger;

pub use descriptor::{
    builtin_servers, sample_server, ServerDescriptor, CAPABILITY_CALENDAR, CAPABILITY_MAPS,
    CAPABILITY_WEATHER,
};
pub use routing::{route_message, RouteMatch};

/// Registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid server list: {0}")]
    InvalidServerList(#[from] serde_json::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Picks the tool server for a message
///
/// The orchestrator depends on this trait rather than on `ServerRegistry`
/// so tests can substitute a fixed routing table.
pub trait ServerRouter: Send + Sync {
    fn route(&self, message: &str) -> Option<ServerDescriptor>;
}

/// Catalog of tool servers
///
/// Built-ins are fixed at construction. Custom servers sit behind a
/// read/write lock: routing takes a read lock, `import_all` swaps the whole
/// list under a single write lock.
pub struct ServerRegistry {
    builtins: Vec<ServerDescriptor>,
    custom: RwLock<Vec<ServerDescriptor>>,
    logger: Arc<dyn Logger>,
}

impl ServerRegistry {
    /// Create a registry with the standard built-in servers
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_builtins(builtin_servers(), logger)
    }

    /// Create a registry with a specific built-in set
    pub fn with_builtins(builtins: Vec<ServerDescriptor>, logger: Arc<dyn Logger>) -> Self {
        Self {
            builtins,
            custom: RwLock::new(Vec::new()),
            logger,
        }
    }

    /// Built-ins first, then custom servers in insertion order
    pub fn list_all(&self) -> Vec<ServerDescriptor> {
        let custom = self.custom.read();
        self.builtins.iter().chain(custom.iter()).cloned().collect()
    }

    pub fn list_enabled(&self) -> Vec<ServerDescriptor> {
        self.list_all().into_iter().filter(|s| s.enabled).collect()
    }

    /// Custom servers only
    pub fn list_custom(&self) -> Vec<ServerDescriptor> {
        self.custom.read().clone()
    }

    /// First server with this id, built-ins before custom
    pub fn find_by_id(&self, id: &str) -> Option<ServerDescriptor> {
        if let Some(server) = self.builtins.iter().find(|s| s.id == id) {
            return Some(server.clone());
        }
        self.custom.read().iter().find(|s| s.id == id).cloned()
    }

    /// Append a custom server
    ///
    /// Ids are not checked for uniqueness and the URL is not probed.
    pub fn add_custom(&self, server: ServerDescriptor) {
        self.logger.info(&format!(
            "[ServerRegistry] Adding custom server '{}' ({})",
            server.id, server.base_url
        ));
        self.custom.write().push(server);
    }

    /// Remove every custom server with this id, returning how many went
    ///
    /// Built-ins are never removed.
    pub fn remove_custom(&self, id: &str) -> usize {
        let mut custom = self.custom.write();
        let before = custom.len();
        custom.retain(|s| s.id != id);
        let removed = before - custom.len();
        if removed > 0 {
            self.logger.info(&format!(
                "[ServerRegistry] Removed {} custom server(s) with id '{}'",
                removed, id
            ));
        }
        removed
    }

    /// Replace the custom set with a serialized server list
    ///
    /// The input is fully parsed before anything changes, so malformed input
    /// leaves the current custom servers untouched.
    pub fn import_all(&self, json: &str) -> RegistryResult<usize> {
        let imported: Vec<ServerDescriptor> = serde_json::from_str(json).map_err(|e| {
            self.logger.warn(&format!("[ServerRegistry] Rejected server list: {}", e));
            RegistryError::from(e)
        })?;

        let count = imported.len();
        *self.custom.write() = imported;

        self.logger.info(&format!("[ServerRegistry] Imported {} custom server(s)", count));
        Ok(count)
    }

    /// Serialize the custom set; built-ins are never exported
    pub fn export_custom(&self) -> RegistryResult<String> {
        let custom = self.custom.read();
        Ok(serde_json::to_string_pretty(&*custom)?)
    }

    /// A serialized server list with one example entry
    pub fn sample_config() -> String {
        serde_json::to_string_pretty(&vec![sample_server()]).unwrap_or_else(|_| "[]".to_string())
    }

    /// Pick the server a message should be routed to, if any
    pub fn match_message(&self, message: &str) -> Option<ServerDescriptor> {
        let servers = self.list_all();
        match route_message(message, &servers) {
            Some((server, how)) => {
                self.logger.debug(&format!(
                    "[ServerRegistry] Routed to '{}' via {:?}",
                    server.id, how
                ));
                Some(server.clone())
            }
            None => {
                self.logger.debug("[ServerRegistry] No server matched");
                None
            }
        }
    }
}

impl ServerRouter for ServerRegistry {
    fn route(&self, message: &str) -> Option<ServerDescriptor> {
        self.match_message(message)
    }
}

impl std::fmt::Debug for ServerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerRegistry")
            .field("builtins", &self.builtins.len())
            .field("custom", &self.custom.read().len())
            .finish()
    }
}
