//! AnthropicProvider - single-shot Claude replies through the genai client
//!
//! Every call sends one user message with no history. Auth goes through an
//! explicit resolver so genai never falls back to its own env var lookup.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};

use crate::config::ClientSettings;
use crate::logging::Logger;
use crate::secrets::is_placeholder_credential;
use crate::types::ConversationTurn;

use super::error::{ProviderError, ProviderResult};
use super::prompt::conversation_prompt;
use super::traits::LlmProvider;

const PROVIDER_LABEL: &str = "Anthropic";
const MAX_TOKENS: u32 = 1024;

/// Stateless Claude provider
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    timeout: Duration,
    client: Client,
    logger: Arc<dyn Logger>,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, settings: &ClientSettings, logger: Arc<dyn Logger>) -> Self {
        let api_key = api_key.into();
        Self {
            client: create_client(api_key.clone()),
            api_key,
            model: settings.anthropic_model.clone(),
            timeout: settings.timeout(),
            logger,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, tool_hints: &[String]) -> ProviderResult<String> {
        if is_placeholder_credential(&self.api_key) {
            return Err(ProviderError::missing_api_key(PROVIDER_LABEL));
        }

        let no_history: &[ConversationTurn] = &[];
        let content = conversation_prompt(prompt, tool_hints, no_history);
        let request = ChatRequest::new(vec![ChatMessage::user(content)]);
        let options = ChatOptions::default().with_max_tokens(MAX_TOKENS);

        self.logger.debug(&format!(
            "[AnthropicProvider] exec_chat model={} prompt_chars={}",
            self.model,
            prompt.chars().count()
        ));

        let call = self.client.exec_chat(&self.model, request, Some(&options));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::timeout(PROVIDER_LABEL, self.timeout.as_secs()))?
            .map_err(|e| ProviderError::api_error(PROVIDER_LABEL, 500, e.to_string()))?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(ProviderError::invalid_response(PROVIDER_LABEL, "no text content")),
        }
    }
}

/// genai client whose auth always comes from `api_key`
fn create_client(api_key: String) -> Client {
    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let key = api_key.clone();
            Box::pin(async move { Ok(Some(AuthData::from_single(key))) })
        },
    );

    Client::builder().with_auth_resolver(auth_resolver).build()
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate_response(&self, prompt: &str, tool_hints: &[String]) -> String {
        match self.complete(prompt, tool_hints).await {
            Ok(text) => text,
            Err(e) => {
                self.logger.error(&format!("[AnthropicProvider] {}", e));
                e.diagnostic()
            }
        }
    }
}
