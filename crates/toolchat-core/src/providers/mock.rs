//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without network
//! dependencies. Every prompt is recorded so tests can assert on what the
//! orchestrator asked.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::traits::LlmProvider;
use crate::logging::Logger;

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the prompt
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Return responses in order, then repeat the last one
    Scripted(Vec<String>),
}

/// A prompt the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub prompt: String,
    pub tool_hints: Vec<String>,
}

/// Mock LLM provider for testing
pub struct MockProvider {
    mode: MockMode,
    script: Mutex<VecDeque<String>>,
    last_scripted: Mutex<Option<String>>,
    prompts: Mutex<Vec<RecordedPrompt>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create with specific mode
    pub fn with_mode(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        let script = match &mode {
            MockMode::Scripted(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            mode,
            script: Mutex::new(script),
            last_scripted: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider (echoes back the prompt)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider that replays `replies` in order
    pub fn scripted<I, S>(replies: I, logger: Arc<dyn Logger>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(
            MockMode::Scripted(replies.into_iter().map(Into::into).collect()),
            logger,
        )
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    fn next_scripted(&self) -> String {
        let next = self.script.lock().pop_front();
        let mut last = self.last_scripted.lock();
        match next {
            Some(reply) => {
                *last = Some(reply.clone());
                reply
            }
            None => last.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_response(&self, prompt: &str, tool_hints: &[String]) -> String {
        self.logger.debug(&format!(
            "[MockProvider] prompt #{} ({} chars)",
            self.call_count() + 1,
            prompt.chars().count()
        ));
        self.prompts.lock().push(RecordedPrompt {
            prompt: prompt.to_string(),
            tool_hints: tool_hints.to_vec(),
        });

        match &self.mode {
            MockMode::Echo => format!("Echo: {}", prompt),
            MockMode::Fixed(response) => response.clone(),
            MockMode::Scripted(_) => self.next_scripted(),
        }
    }
}
