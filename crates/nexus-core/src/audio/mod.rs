//! Audio framing and playback ports.

pub mod playback;
pub mod wav;

pub use playback::{AudioSink, Playback, PlaybackController};
pub use wav::{encode_wav, parse_sample_rate, pcm16_from_le_bytes, wav_from_speech};
