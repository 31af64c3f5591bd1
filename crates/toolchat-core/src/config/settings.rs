//! Client settings stored in `config.yaml`

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Settings shared by the providers and the tool client
///
/// ```yaml
/// provider: gemini
/// dev_mode: false
/// timeout_secs: 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Preferred provider ("gemini", "anthropic", "mock")
    pub provider: Option<String>,
    /// Accept self-signed certificates and any hostname on tool servers
    pub dev_mode: bool,
    /// Upper bound for every network call
    pub timeout_secs: u64,
    pub anthropic_model: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            provider: None,
            dev_mode: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }
}

impl ClientSettings {
    /// Timeout as a `Duration`; zero falls back to the default
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_gemini_api_base(mut self, base: impl Into<String>) -> Self {
        self.gemini_api_base = base.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: ClientSettings = serde_yaml::from_str("provider: anthropic\n").unwrap();
        assert_eq!(settings.provider.as_deref(), Some("anthropic"));
        assert!(!settings.dev_mode);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.anthropic_model, DEFAULT_ANTHROPIC_MODEL);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let settings = ClientSettings::default().with_timeout_secs(0);
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            ClientSettings::default().with_timeout_secs(5).timeout(),
            Duration::from_secs(5)
        );
    }
}
