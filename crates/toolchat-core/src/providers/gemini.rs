//! GeminiProvider - multi-turn replies from the Gemini `generateContent` API
//!
//! The provider owns a bounded conversation history. Recent turns are folded
//! into the prompt text; the request itself always carries a single content
//! entry. One call holds the history lock from prompt building until the
//! exchange is recorded, so concurrent calls on the same instance queue up.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::ClientSettings;
use crate::logging::Logger;
use crate::secrets::is_placeholder_credential;
use crate::types::ConversationHistory;

use super::error::{ProviderError, ProviderResult};
use super::prompt::conversation_prompt;
use super::traits::LlmProvider;

const PROVIDER_LABEL: &str = "Gemini";

/// Prior turns injected into each prompt
pub const HISTORY_CONTEXT_TURNS: usize = 5;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentRequest {
    fn for_prompt(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(text) }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Stateful Gemini provider
pub struct GeminiProvider {
    api_key: String,
    model: String,
    api_base: String,
    timeout_secs: u64,
    http: reqwest::Client,
    history: Mutex<ConversationHistory>,
    logger: Arc<dyn Logger>,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, settings: &ClientSettings, logger: Arc<dyn Logger>) -> Self {
        let timeout = settings.timeout();
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                logger.warn(&format!("[GeminiProvider] Falling back to default HTTP client: {}", e));
                reqwest::Client::new()
            });

        Self {
            api_key: api_key.into(),
            model: settings.gemini_model.clone(),
            api_base: settings.gemini_api_base.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
            http,
            history: Mutex::new(ConversationHistory::new()),
            logger,
        }
    }

    /// Endpoint URL without the key parameter
    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }

    /// Number of recorded turns
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    async fn call_api(&self, prompt: String) -> ProviderResult<String> {
        let body = GenerateContentRequest::for_prompt(prompt);
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(PROVIDER_LABEL, self.timeout_secs)
                } else {
                    ProviderError::Http(e.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error(PROVIDER_LABEL, status.as_u16(), text));
        }

        // The request URL carries the key; keep it out of error text
        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::invalid_response(PROVIDER_LABEL, "no candidate text")),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_response(&self, prompt: &str, tool_hints: &[String]) -> String {
        if is_placeholder_credential(&self.api_key) {
            return ProviderError::missing_api_key(PROVIDER_LABEL).diagnostic();
        }

        let mut history = self.history.lock().await;
        let text = conversation_prompt(prompt, tool_hints, history.recent(HISTORY_CONTEXT_TURNS));

        self.logger.debug(&format!(
            "[GeminiProvider] POST {} (history={})",
            self.endpoint(),
            history.len()
        ));

        match self.call_api(text).await {
            Ok(reply) => {
                history.record_exchange(prompt, reply.as_str());
                reply
            }
            Err(e) => {
                self.logger.error(&format!("[GeminiProvider] {}", e));
                e.diagnostic()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        let settings = ClientSettings::default().with_gemini_api_base(server.uri());
        GeminiProvider::new("test-key", &settings, Arc::new(NoOpLogger))
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::for_prompt("hi".into())).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][3]["category"], "HARM_CATEGORY_DANGEROUS_CONTENT");
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[tokio::test]
    async fn test_placeholder_key_makes_no_request() {
        let server = MockServer::start().await;
        let settings = ClientSettings::default().with_gemini_api_base(server.uri());
        let provider = GeminiProvider::new("your-gemini-api-key-here", &settings, Arc::new(NoOpLogger));

        let reply = provider.generate_response("hello", &[]).await;
        assert!(reply.contains("Gemini API key"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Hello there")))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert_eq!(provider.generate_response("hi", &[]).await, "Hello there");
        assert_eq!(provider.history_len().await, 2);

        provider.generate_response("second question", &[]).await;
        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        let sent = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(sent.contains("user: hi"));
        assert!(sent.contains("assistant: Hello there"));
        assert!(sent.contains("second question"));
    }

    #[tokio::test]
    async fn test_api_error_is_diagnostic_and_not_recorded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let reply = provider.generate_response("hi", &[]).await;
        assert!(reply.starts_with("⚠️"));
        assert!(reply.contains("429"));
        assert_eq!(provider.history_len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
            .mount(&server)
            .await;

        let reply = provider(&server).generate_response("hi", &[]).await;
        assert!(reply.contains("empty response"));
    }

    #[derive(Default)]
    struct RecordingLogger(parking_lot::Mutex<Vec<String>>);

    impl Logger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn info(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn warn(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn error(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
    }

    const SECRET: &str = "SUPERSECRETKEY123";

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let logger = Arc::new(RecordingLogger::default());
        let settings = ClientSettings::default()
            .with_gemini_api_base("http://127.0.0.1:1")
            .with_timeout_secs(2);
        let provider = GeminiProvider::new(SECRET, &settings, logger.clone());

        let reply = provider.generate_response("hi", &[]).await;

        assert!(reply.starts_with("⚠️"));
        assert!(!reply.contains(SECRET), "reply leaked key: {}", reply);
        assert!(logger.0.lock().iter().all(|line| !line.contains(SECRET)));
    }

    #[tokio::test]
    async fn test_undecodable_body_hides_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let logger = Arc::new(RecordingLogger::default());
        let settings = ClientSettings::default().with_gemini_api_base(server.uri());
        let provider = GeminiProvider::new(SECRET, &settings, logger.clone());

        let reply = provider.generate_response("hi", &[]).await;

        assert!(reply.starts_with("⚠️"));
        assert!(!reply.contains(SECRET), "reply leaked key: {}", reply);
        assert!(logger.0.lock().iter().all(|line| !line.contains(SECRET)));
        assert_eq!(provider.history_len().await, 0);
    }
}
