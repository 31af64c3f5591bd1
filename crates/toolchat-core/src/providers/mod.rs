//! LLM Provider implementations
//!
//! ## Architecture
//!
//! Callers only see the [`LlmProvider`] trait. The variant is picked once per
//! session from the available credentials:
//!
//! - `GeminiProvider`: multi-turn, keeps its own history, talks to the
//!   `generateContent` REST endpoint through reqwest
//! - `AnthropicProvider`: single-shot Claude calls through the `genai` crate
//! - `MockProvider`: deterministic replies for tests and offline runs
//!
//! Credentials come from a [`SecretStore`], never from the providers'
//! own environment lookups.

mod traits;
mod error;
mod prompt;
mod anthropic;
mod gemini;
mod mock;

pub use traits::LlmProvider;
pub use error::{ProviderError, ProviderResult};
pub use anthropic::AnthropicProvider;
pub use gemini::{GeminiProvider, HISTORY_CONTEXT_TURNS};
pub use mock::{MockMode, MockProvider, RecordedPrompt};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ClientSettings;
use crate::logging::Logger;
use crate::secrets::SecretStore;

/// The provider variants this crate can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    Anthropic,
    Mock,
}

impl ProviderKind {
    /// Secret store key holding this provider's credential
    pub fn secret_key(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mock => "mock",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Anthropic => "Claude (Anthropic)",
            ProviderKind::Mock => "Mock",
        }
    }

    fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Mock)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.secret_key())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(ProviderError::Other(format!("Unknown provider: {}", other))),
        }
    }
}

/// Create a provider of the given kind
///
/// An empty key is accepted; the provider then answers with the
/// credential diagnostic instead of calling out.
pub fn create_provider(
    kind: ProviderKind,
    api_key: impl Into<String>,
    settings: &ClientSettings,
    logger: Arc<dyn Logger>,
) -> Arc<dyn LlmProvider> {
    match kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, settings, logger)),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key, settings, logger)),
        ProviderKind::Mock => Arc::new(MockProvider::echo(logger)),
    }
}

/// Provider kinds usable with the credentials in `secrets`, in preference order
pub fn available_providers(secrets: &dyn SecretStore) -> Vec<ProviderKind> {
    [ProviderKind::Gemini, ProviderKind::Anthropic]
        .into_iter()
        .filter(|kind| secrets.has(kind.secret_key()))
        .collect()
}

/// Pick the session's provider from settings and available credentials
///
/// Order: the preferred provider from settings if usable, then Gemini, then
/// Anthropic. With no credential at all an unconfigured Gemini provider is
/// returned so every reply explains what is missing.
pub fn select_provider(
    secrets: &dyn SecretStore,
    settings: &ClientSettings,
    logger: Arc<dyn Logger>,
) -> Arc<dyn LlmProvider> {
    let preferred = settings.provider.as_deref().and_then(|name| match name.parse::<ProviderKind>() {
        Ok(kind) => Some(kind),
        Err(e) => {
            logger.warn(&format!("[Providers] Ignoring preferred provider: {}", e));
            None
        }
    });

    let usable = |kind: ProviderKind| !kind.requires_api_key() || secrets.has(kind.secret_key());

    let chosen = preferred
        .filter(|kind| usable(*kind))
        .or_else(|| available_providers(secrets).into_iter().next());

    match chosen {
        Some(kind) => {
            logger.info(&format!("[Providers] Using {}", kind.display_name()));
            let key = secrets.get(kind.secret_key()).unwrap_or_default();
            create_provider(kind, key, settings, logger)
        }
        None => {
            logger.warn("[Providers] No API key found; replies will explain how to configure one");
            create_provider(ProviderKind::Gemini, String::new(), settings, logger)
        }
    }
}
