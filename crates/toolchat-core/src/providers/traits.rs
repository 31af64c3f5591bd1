//! Provider trait definition

use async_trait::async_trait;

/// A text generator the orchestrator can consult
///
/// Implementations never fail outward: transport, credential and parse
/// problems come back as diagnostic text so the chat always gets a reply.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "anthropic")
    fn name(&self) -> &str;

    /// Produce a reply for `prompt`
    ///
    /// `tool_hints` names tools the caller could use; conversational
    /// variants mention them in the prompt, others may ignore them.
    async fn generate_response(&self, prompt: &str, tool_hints: &[String]) -> String;
}
