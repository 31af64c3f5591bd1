//! Tool orchestration for a single chat message
//!
//! ```text
//! Routing ──▶ Listing ──▶ Deciding ──▶ Executing ──▶ Formatting ──▶ Done
//!    │           │            │
//!    └───────────┴────────────┴──────▶ Fallback (plain answer, maybe a notice)
//! ```
//!
//! Every path ends in exactly one reply text. Faults that escape the
//! pipeline are caught at `respond_detailed` and turned into an apology
//! followed by a plain answer.

mod decision;
mod outcome;
mod prompts;

pub use decision::{decision_reason, parse_arguments, parse_tool_decision};
pub use outcome::{FallbackReason, OrchestratorReply, ReplyPath, Stage};
pub use prompts::{connection_failed_notice, decision_prompt, fault_notice, format_prompt};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use crate::logging::Logger;
use crate::providers::LlmProvider;
use crate::registry::{ServerDescriptor, ServerRouter};
use crate::tools::ToolClient;
use crate::types::{Language, ToolCall, ToolResult};

/// Routes a message to a tool server and runs the tool-assisted pipeline
///
/// The orchestrator holds no per-message state; one instance can serve any
/// number of concurrent messages.
pub struct ToolOrchestrator {
    router: Arc<dyn ServerRouter>,
    tool_client: Arc<dyn ToolClient>,
    logger: Arc<dyn Logger>,
}

impl ToolOrchestrator {
    pub fn new(
        router: Arc<dyn ServerRouter>,
        tool_client: Arc<dyn ToolClient>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            router,
            tool_client,
            logger,
        }
    }

    /// Answer `message`, using a tool when one applies
    pub async fn respond(&self, message: &str, provider: &dyn LlmProvider) -> String {
        self.respond_detailed(message, provider).await.text
    }

    /// Answer `message` and report which path produced the reply
    pub async fn respond_detailed(
        &self,
        message: &str,
        provider: &dyn LlmProvider,
    ) -> OrchestratorReply {
        let stage = Mutex::new(Stage::Routing);

        let outcome = AssertUnwindSafe(self.run(message, provider, &stage))
            .catch_unwind()
            .await;

        match outcome {
            Ok(reply) => reply,
            Err(panic) => {
                let at = *stage.lock();
                let detail = format!("fault while {}: {}", at, panic_message(panic.as_ref()));
                self.logger.error(&format!("[Orchestrator] {}", detail));
                self.recover(message, provider, detail).await
            }
        }
    }

    fn enter(&self, stage: &Mutex<Stage>, next: Stage) {
        *stage.lock() = next;
        self.logger.debug(&format!("[Orchestrator] -> {}", next));
    }

    async fn run(
        &self,
        message: &str,
        provider: &dyn LlmProvider,
        stage: &Mutex<Stage>,
    ) -> OrchestratorReply {
        let language = Language::detect(message);

        let server = match self.router.route(message) {
            Some(server) => server,
            None => {
                self.logger.info("[Orchestrator] No server matched; answering directly");
                return self
                    .fallback(message, provider, stage, FallbackReason::NoMatchingServer, None)
                    .await;
            }
        };
        self.logger.info(&format!(
            "[Orchestrator] Routed to {} ({})",
            server.name, server.base_url
        ));

        self.enter(stage, Stage::Listing);
        let tools = match self.list_tools(&server).await {
            Ok(tools) => tools,
            Err(reason) => {
                let notice = connection_failed_notice(language, &server.name);
                return self.fallback(message, provider, stage, reason, Some(notice)).await;
            }
        };

        self.enter(stage, Stage::Deciding);
        let prompt = decision_prompt(message, &server, &tools);
        let reply = provider.generate_response(&prompt, &[]).await;
        let decision = parse_tool_decision(&reply, &server);
        if !decision.use_tool {
            self.logger.info(&format!(
                "[Orchestrator] No tool used (reason: {})",
                decision_reason(&reply).unwrap_or_else(|| "unparsed".to_string())
            ));
            return self
                .fallback(message, provider, stage, FallbackReason::NoToolNeeded, None)
                .await;
        }

        self.enter(stage, Stage::Executing);
        let results = self.execute(&decision.calls).await;

        self.enter(stage, Stage::Formatting);
        let text = provider
            .generate_response(&format_prompt(message, &results), &[])
            .await;

        self.enter(stage, Stage::Done);
        OrchestratorReply {
            text,
            path: ReplyPath::ToolAssisted {
                server_id: server.id,
                results,
            },
        }
    }

    /// Ping the server, then list its tools
    async fn list_tools(&self, server: &ServerDescriptor) -> Result<Vec<String>, FallbackReason> {
        if !self.tool_client.ping(&server.base_url).await {
            self.logger.warn(&format!("[Orchestrator] {} is unreachable", server.id));
            return Err(FallbackReason::ServerUnreachable {
                server: server.id.clone(),
            });
        }

        let tools = self.tool_client.list_tools(&server.base_url, &server.id).await;
        if tools.is_empty() {
            self.logger.warn(&format!("[Orchestrator] {} listed no tools", server.id));
            return Err(FallbackReason::NoToolsListed {
                server: server.id.clone(),
            });
        }
        Ok(tools)
    }

    /// Run each call in order; a failing call becomes an error result
    async fn execute(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let outcome = self
                .tool_client
                .try_invoke(&call.server_url, &call.server_id, &call.tool_name, &call.arguments)
                .await;
            let result = match outcome {
                Ok(body) => ToolResult::success(&call.tool_name, body),
                Err(e) => {
                    self.logger.warn(&format!(
                        "[Orchestrator] {} failed: {}",
                        call.tool_name, e
                    ));
                    ToolResult::error(&call.tool_name, e.to_string())
                }
            };
            results.push(result);
        }
        results
    }

    async fn fallback(
        &self,
        message: &str,
        provider: &dyn LlmProvider,
        stage: &Mutex<Stage>,
        reason: FallbackReason,
        notice: Option<String>,
    ) -> OrchestratorReply {
        self.enter(stage, Stage::Fallback);
        let answer = provider.generate_response(message, &[]).await;
        let text = match notice {
            Some(notice) => format!("{}\n\n{}", notice, answer),
            None => answer,
        };
        OrchestratorReply {
            text,
            path: ReplyPath::Fallback(reason),
        }
    }

    /// Apology plus a plain answer, or the apology alone if that faults too
    async fn recover(
        &self,
        message: &str,
        provider: &dyn LlmProvider,
        detail: String,
    ) -> OrchestratorReply {
        let apology = fault_notice(Language::detect(message));
        let answer = AssertUnwindSafe(provider.generate_response(message, &[]))
            .catch_unwind()
            .await;

        let text = match answer {
            Ok(answer) => format!("{}\n\n{}", apology, answer),
            Err(panic) => {
                self.logger.error(&format!(
                    "[Orchestrator] Fallback also failed: {}",
                    panic_message(panic.as_ref())
                ));
                apology.to_string()
            }
        };

        OrchestratorReply {
            text,
            path: ReplyPath::Fallback(FallbackReason::InternalFault(detail)),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
