//! Durable key-value state.
//!
//! All persisted application state lives under a handful of string keys
//! behind the [`StateRepository`] port.

pub mod memory;
pub mod state;

pub use memory::InMemoryStateRepository;
pub use state::StateRepository;

/// Serialized session collection.
pub const SESSIONS_KEY: &str = "nexus.sessions";
/// Id of the active session.
pub const ACTIVE_SESSION_KEY: &str = "nexus.active_session";
/// `light` or `dark`.
pub const THEME_KEY: &str = "nexus.theme";
/// Selected speech voice name.
pub const VOICE_KEY: &str = "nexus.tts_voice";
