//! Core types shared across the engine

mod tool;
mod conversation;
mod language;

pub use tool::{scalar_to_param, ToolArguments, ToolCall, ToolDecision, ToolResult};
pub use conversation::{ConversationHistory, ConversationTurn, TurnRole, MAX_HISTORY_TURNS};
pub use language::{contains_japanese, Language};
