//! Tool client trait

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ToolArguments;

/// Tool client errors
#[derive(Error, Debug)]
pub enum ToolClientError {
    #[error("Invalid server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ToolClientResult<T> = Result<T, ToolClientError>;

/// Client for the tool server HTTP convention
///
/// - `GET {base}/` liveness
/// - `GET {base}/{server_id}/tools` tool names as a JSON string array
/// - `GET {base}/{server_id}/call/{tool}?k=v` opaque result body
#[async_trait]
pub trait ToolClient: Send + Sync {
    /// True only when the server answers its root with a 2xx
    async fn ping(&self, base_url: &str) -> bool;

    /// Tool names offered by the server; empty on any failure
    async fn list_tools(&self, base_url: &str, server_id: &str) -> Vec<String>;

    /// Invoke a tool, returning the body as-is for any HTTP status
    ///
    /// Only transport-level failures are errors.
    async fn try_invoke(
        &self,
        base_url: &str,
        server_id: &str,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolClientResult<String>;

    /// Like `try_invoke`, with failures rendered as text
    async fn invoke(
        &self,
        base_url: &str,
        server_id: &str,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> String {
        match self.try_invoke(base_url, server_id, tool_name, arguments).await {
            Ok(body) => body,
            Err(e) => format!("Error calling tool: {}", e),
        }
    }
}
