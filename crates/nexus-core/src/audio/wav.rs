//! RIFF/WAVE framing for raw 16-bit PCM.
//!
//! Speech synthesis returns headerless little-endian PCM with the sample
//! rate carried in the MIME type (`audio/L16;codec=pcm;rate=24000`). Players
//! need a WAV container, so the samples are wrapped in a 44-byte header.

use std::sync::LazyLock;

use nexus_types::speech::{SpeechError, SynthesizedSpeech};
use regex::Regex;
use tracing::debug;

/// Rate assumed when the MIME type does not name one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Size of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

static RATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"rate=(\d+)").unwrap());

/// Extract the sample rate from a MIME type such as
/// `audio/L16;codec=pcm;rate=24000`.
pub fn parse_sample_rate(mime_type: &str) -> Option<u32> {
    RATE_RE
        .captures(mime_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Reinterpret little-endian bytes as signed 16-bit samples. A trailing odd
/// byte is dropped.
pub fn pcm16_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Frame mono 16-bit samples as a WAV file.
///
/// Fails with [`SpeechError::InvalidAudio`] when the rate or the payload
/// size does not fit the 32-bit header fields.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, SpeechError> {
    let data_len = samples
        .len()
        .checked_mul(usize::from(BLOCK_ALIGN))
        .and_then(|len| u32::try_from(len).ok())
        .ok_or(SpeechError::InvalidAudio)?;
    let riff_len = data_len.checked_add(36).ok_or(SpeechError::InvalidAudio)?;
    let byte_rate = sample_rate
        .checked_mul(u32::from(BLOCK_ALIGN))
        .ok_or(SpeechError::InvalidAudio)?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(out)
}

/// Validate synthesized audio and frame it as WAV.
pub fn wav_from_speech(speech: &SynthesizedSpeech) -> Result<Vec<u8>, SpeechError> {
    if !speech.mime_type.starts_with("audio/") || speech.pcm.len() < 2 {
        return Err(SpeechError::InvalidAudio);
    }

    let sample_rate = parse_sample_rate(&speech.mime_type).unwrap_or_else(|| {
        debug!(mime_type = %speech.mime_type, "No sample rate in MIME type, assuming default");
        DEFAULT_SAMPLE_RATE
    });

    let samples = pcm16_from_le_bytes(&speech.pcm);
    debug!(samples = samples.len(), sample_rate, "Framing speech as WAV");
    encode_wav(&samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(parse_sample_rate("audio/L16;codec=pcm;rate=24000"), Some(24_000));
        assert_eq!(parse_sample_rate("audio/L16;rate=16000"), Some(16_000));
        assert_eq!(parse_sample_rate("audio/L16"), None);
    }

    #[test]
    fn test_pcm16_drops_trailing_odd_byte() {
        assert_eq!(pcm16_from_le_bytes(&[0x01, 0x00, 0xff, 0x7f, 0x09]), vec![1, 32767]);
    }

    #[test]
    fn test_encode_wav_header_fields() {
        let samples = [0i16, 32767, -32768];
        let wav = encode_wav(&samples, 24_000).unwrap();

        assert_eq!(wav.len(), 50);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 42);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 24_000);
        assert_eq!(u32_at(&wav, 28), 48_000);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 6);
        assert_eq!(pcm16_from_le_bytes(&wav[WAV_HEADER_LEN..]), samples);
    }

    #[test]
    fn test_wav_from_speech_uses_mime_rate() {
        let speech = SynthesizedSpeech {
            mime_type: "audio/L16;codec=pcm;rate=16000".to_string(),
            pcm: vec![0x10, 0x00, 0x20, 0x00],
        };
        let wav = wav_from_speech(&speech).unwrap();
        assert_eq!(u32_at(&wav, 24), 16_000);
        assert_eq!(u32_at(&wav, 40), 4);
    }

    #[test]
    fn test_wav_from_speech_rejects_non_audio() {
        let speech = SynthesizedSpeech {
            mime_type: "text/plain".to_string(),
            pcm: vec![0, 0],
        };
        assert!(matches!(wav_from_speech(&speech), Err(SpeechError::InvalidAudio)));
    }

    #[test]
    fn test_wav_from_speech_rejects_empty_pcm() {
        let speech = SynthesizedSpeech {
            mime_type: "audio/L16;rate=24000".to_string(),
            pcm: Vec::new(),
        };
        assert!(matches!(wav_from_speech(&speech), Err(SpeechError::InvalidAudio)));
    }

    #[test]
    fn test_oversized_rate_rejected() {
        let rate = parse_sample_rate("audio/L16;codec=pcm;rate=3000000000").unwrap();
        assert!(matches!(encode_wav(&[1, 2], rate), Err(SpeechError::InvalidAudio)));

        let speech = SynthesizedSpeech {
            mime_type: "audio/L16;codec=pcm;rate=3000000000".to_string(),
            pcm: vec![0x01, 0x00, 0x02, 0x00],
        };
        assert!(matches!(wav_from_speech(&speech), Err(SpeechError::InvalidAudio)));
    }

    #[test]
    fn test_largest_representable_rate_accepted() {
        let wav = encode_wav(&[0], u32::MAX / 2).unwrap();
        assert_eq!(u32_at(&wav, 28), u32::MAX - 1);
    }
}
