//! Generative-language request/response types for Nexus.
//!
//! These are provider-agnostic: the Gemini wire structures live in
//! nexus-infra and convert to and from these.

use serde::{Deserialize, Serialize};

use crate::chat::{Citation, Role};
use crate::error::ExecutorError;

/// One conversation turn as sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Request for a single chat completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation history; never empty and never starting with a model turn.
    pub turns: Vec<Turn>,
    pub system_instruction: String,
    /// Enable the provider's web-search grounding tool.
    pub web_search: bool,
}

/// A model reply with its grounding citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Errors from chat-completion providers.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error(transparent)]
    Request(#[from] ExecutorError),

    /// An error object embedded in the response body.
    #[error("{message}")]
    Api { message: String },

    #[error("Received empty chat content from the API.")]
    EmptyResponse,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
