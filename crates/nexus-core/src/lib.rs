//! Business logic and port definitions for Nexus.
//!
//! This crate defines the "ports" (transport, repository, provider and audio
//! sink traits) that the infrastructure layer implements, plus the logic
//! that runs on top of them: the resilient request executor, the session
//! state machine, the chat and narration services, and WAV framing. It
//! depends only on `nexus-types` -- never on `nexus-infra`.

pub mod audio;
pub mod chat;
pub mod http;
pub mod preferences;
pub mod speech;
pub mod storage;
