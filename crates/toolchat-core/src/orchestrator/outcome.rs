//! Pipeline stages and reply classification

use std::fmt;

use crate::types::ToolResult;

/// Where a message is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Routing,
    Listing,
    Deciding,
    Executing,
    Formatting,
    Done,
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Routing => "routing",
            Stage::Listing => "listing",
            Stage::Deciding => "deciding",
            Stage::Executing => "executing",
            Stage::Formatting => "formatting",
            Stage::Done => "done",
            Stage::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Why a reply was produced without tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No enabled server matched the message
    NoMatchingServer,
    /// The matched server did not answer its ping
    ServerUnreachable { server: String },
    /// The matched server answered but listed no tools
    NoToolsListed { server: String },
    /// The LLM declined to use a tool, or its decision was unusable
    NoToolNeeded,
    /// A fault escaped the pipeline and was caught at its boundary
    InternalFault(String),
}

impl FallbackReason {
    /// Whether the user sees a notice above the plain answer
    pub fn has_notice(&self) -> bool {
        !matches!(self, FallbackReason::NoMatchingServer | FallbackReason::NoToolNeeded)
    }
}

/// How the reply was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPath {
    /// Tools ran and the LLM formatted their results
    ToolAssisted {
        server_id: String,
        results: Vec<ToolResult>,
    },
    /// Plain conversational answer
    Fallback(FallbackReason),
}

/// Final text plus how it came about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorReply {
    pub text: String,
    pub path: ReplyPath,
}

impl OrchestratorReply {
    pub fn is_tool_assisted(&self) -> bool {
        matches!(self.path, ReplyPath::ToolAssisted { .. })
    }

    /// Results of the executed calls; empty on fallback
    pub fn tool_results(&self) -> &[ToolResult] {
        match &self.path {
            ReplyPath::ToolAssisted { results, .. } => results,
            ReplyPath::Fallback(_) => &[],
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.path {
            ReplyPath::Fallback(reason) => Some(reason),
            ReplyPath::ToolAssisted { .. } => None,
        }
    }
}
