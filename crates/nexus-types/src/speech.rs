//! Text-to-speech request/response types.

use serde::{Deserialize, Serialize};

use crate::error::ExecutorError;
use crate::preferences::Voice;

/// Text to be read aloud with the given voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Voice,
}

/// Raw synthesized audio: little-endian 16-bit PCM plus its MIME type
/// (e.g. `audio/L16;codec=pcm;rate=24000`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub mime_type: String,
    pub pcm: Vec<u8>,
}

/// Errors from speech synthesis and playback.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error(transparent)]
    Request(#[from] ExecutorError),

    #[error("{message}")]
    Api { message: String },

    #[error("Invalid or empty audio data received from API.")]
    InvalidAudio,

    #[error("playback failed: {0}")]
    Playback(String),
}
