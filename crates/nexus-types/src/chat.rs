//! Chat session, message, and citation types for Nexus.
//!
//! A session is a named conversation with an append-only message log.
//! Model messages may carry web citations from search grounding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Title shown for a session before its first user message.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Greeting placed at the head of every fresh session.
pub const GREETING_TEXT: &str = "Hello! Welcome to Nexus.";

/// Notice that replaces a session's log when it is cleared.
pub const CLEARED_TEXT: &str = "Chat cleared! How can I help you next?";

/// Unique identifier for a chat session, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new SessionId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message. The remote API only knows these two roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "model" => Ok(Role::Model),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A web source attached to a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

impl Citation {
    /// Build a citation only when both fields are present and non-empty.
    pub fn from_parts(uri: Option<&str>, title: Option<&str>) -> Option<Self> {
        match (uri, title) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => Some(Self {
                uri: uri.to_string(),
                title: title.to_string(),
            }),
            _ => None,
        }
    }
}

/// A single message within a session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Citation>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Model,
            text: text.into(),
            sources,
            created_at: Utc::now(),
        }
    }
}

/// A named conversation thread.
///
/// `messages` is never empty: a fresh session starts with a model greeting
/// and a cleared session holds a single reset notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// A fresh session holding only the greeting.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::model(GREETING_TEXT, Vec::new())],
        }
    }

    /// True while the log holds nothing but the initial model message.
    pub fn is_untouched(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].role == Role::Model
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
