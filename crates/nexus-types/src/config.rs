//! Global configuration types for Nexus.
//!
//! `NexusConfig` represents the `config.toml` in the data directory that
//! selects endpoints, models, the system prompt, and retry behaviour.
//! Credentials are never part of this file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Nexus, a highly capable and helpful assistant. \
If the user asks about recent events, up-to-date information, or specific facts, use your search \
tool to find the most relevant and current answers, and base your answer on the search results \
when they are available. Give comprehensive, detailed explanations, especially for complex \
questions.";

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NexusConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Attach the web-search grounding tool to chat requests.
    #[serde(default = "default_web_search")]
    pub web_search: bool,

    /// Per-attempt HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub retry: RetrySettings,

    /// Command used to play WAV files; the file path is appended as the last
    /// argument. When absent, audio is only written to disk.
    #[serde(default)]
    pub player_command: Option<Vec<String>>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_web_search() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            speech_model: default_speech_model(),
            system_prompt: default_system_prompt(),
            web_search: default_web_search(),
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetrySettings::default(),
            player_command: None,
        }
    }
}

/// Retry settings as written in `config.toml` (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl From<RetrySettings> for RetryPolicy {
    fn from(settings: RetrySettings) -> Self {
        RetryPolicy {
            max_retries: settings.max_retries,
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = NexusConfig::default();
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.speech_model, DEFAULT_SPEECH_MODEL);
        assert!(config.web_search);
        assert_eq!(config.retry.max_retries, 5);
        assert!(config.player_command.is_none());
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: NexusConfig = toml::from_str("").unwrap();
        assert_eq!(config, NexusConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
chat_model = "gemini-2.5-pro"
web_search = false
player_command = ["aplay", "-q"]

[retry]
max_retries = 3
initial_delay_ms = 250
"#;
        let config: NexusConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat_model, "gemini-2.5-pro");
        assert!(!config.web_search);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_delay_ms, 250);
        assert_eq!(config.retry.max_delay_ms, 30_000);
        assert_eq!(
            config.player_command,
            Some(vec!["aplay".to_string(), "-q".to_string()])
        );
    }

    #[test]
    fn test_retry_settings_into_policy() {
        let policy: RetryPolicy = RetrySettings::default().into();
        assert_eq!(policy, RetryPolicy::default());
    }
}
