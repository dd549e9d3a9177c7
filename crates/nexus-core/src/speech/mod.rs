//! Text-to-speech: the synthesis port and the narrator that plays replies.

pub mod narrator;
pub mod provider;

pub use narrator::{NarrationOutcome, Narrator};
pub use provider::SpeechProvider;
