//! Shared domain types for Nexus.
//!
//! Sessions, messages, citations, preferences, HTTP request descriptors,
//! provider request/response shapes, configuration, and the error enums
//! shared across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod preferences;
pub mod speech;
