//! toolchat Core
//!
//! Intent routing and tool orchestration for LLM chat sessions. A chat
//! message is matched against a registry of tool servers; when one applies,
//! an LLM decides which tool to call, the call runs over HTTP, and the LLM
//! turns the raw result into the answer. Every failure falls back to a plain
//! conversational reply.
//!
//! ## Tool Orchestration
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolchat_core::{
//!     select_provider, ClientSettings, ConsoleLogger, EnvSecretStore, HttpToolClient,
//!     ServerRegistry, ToolOrchestrator,
//! };
//!
//! let logger = Arc::new(ConsoleLogger::new());
//! let settings = ClientSettings::default();
//!
//! let registry = Arc::new(ServerRegistry::new(logger.clone()));
//! let tools = Arc::new(HttpToolClient::new(&settings, logger.clone())?);
//! let orchestrator = ToolOrchestrator::new(registry, tools, logger.clone());
//!
//! let provider = select_provider(&EnvSecretStore::new(), &settings, logger);
//! let answer = orchestrator.respond("今日の千葉の天気を教えて", provider.as_ref()).await;
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod registry;
pub mod providers;
pub mod tools;
pub mod orchestrator;

// Re-export commonly used types
pub use types::{
    ConversationHistory, ConversationTurn, Language, ToolArguments, ToolCall, ToolDecision,
    ToolResult, TurnRole,
};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretInfo, SecretStore, SecretStoreError};

pub use logging::{ConsoleLogger, FileLogger, Logger, NoOpLogger};

pub use config::{ClientSettings, ConfigError, ConfigProvider, FileConfigProvider, MemoryConfigProvider};

pub use registry::{RegistryError, ServerDescriptor, ServerRegistry, ServerRouter};

pub use providers::{
    create_provider, select_provider, LlmProvider, MockProvider, ProviderError, ProviderKind,
};

pub use tools::{HttpToolClient, ToolClient, ToolClientError};

pub use orchestrator::{FallbackReason, OrchestratorReply, ReplyPath, Stage, ToolOrchestrator};
