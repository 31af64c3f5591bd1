//! Tool call, decision and result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments for a tool invocation, sent as query parameters
///
/// Values are scalars rendered as strings. A `BTreeMap` keeps the rendered
/// query string stable; argument order carries no meaning.
pub type ToolArguments = BTreeMap<String, String>;

/// A single decided tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Base URL of the tool server
    pub server_url: String,
    /// Server id, used as the first path segment on the tool server
    pub server_id: String,
    /// Name of the tool being called
    pub tool_name: String,
    /// Arguments for the tool
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(
        server_url: impl Into<String>,
        server_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: ToolArguments,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            server_id: server_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }
}

/// Outcome of asking the LLM whether a tool is needed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolDecision {
    /// Whether the LLM asked for a tool
    pub use_tool: bool,
    /// Calls to execute, in order
    pub calls: Vec<ToolCall>,
}

impl ToolDecision {
    /// A decision that no tool should be used
    pub fn no_tool() -> Self {
        Self::default()
    }

    /// A decision to run exactly one call
    pub fn single(call: ToolCall) -> Self {
        Self {
            use_tool: true,
            calls: vec![call],
        }
    }
}

/// Labeled result of executing one tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that produced this result
    #[serde(rename = "toolName")]
    pub tool_name: String,
    /// Raw response body, or a diagnostic when the call failed
    pub content: String,
    /// Whether the call itself failed
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            content: error.into(),
            is_error: true,
        }
    }

    /// Render as a single labeled line for the formatting prompt
    pub fn labeled(&self) -> String {
        if self.is_error {
            format!("[error] {}: {}", self.tool_name, self.content)
        } else {
            format!("[ok] {}: {}", self.tool_name, self.content)
        }
    }
}

/// Render a JSON value as a query parameter value
///
/// Strings are used as-is; numbers, booleans, null and nested values use
/// their JSON text.
pub fn scalar_to_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
