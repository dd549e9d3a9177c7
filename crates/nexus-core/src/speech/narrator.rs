//! Reads model replies aloud.
//!
//! Narration is a toggle per message: asking for the message that is
//! already playing stops it, asking for any other message replaces
//! whatever is playing. Failures are transient and never enter the
//! conversation log.

use nexus_types::chat::MessageId;
use nexus_types::preferences::Voice;
use nexus_types::speech::{SpeechError, SpeechRequest};
use tracing::{info, warn};

use super::provider::SpeechProvider;
use crate::audio::playback::{AudioSink, PlaybackController};
use crate::audio::wav::wav_from_speech;

/// What a [`Narrator::toggle`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationOutcome {
    Started,
    Stopped,
    Failed { error: String },
}

pub struct Narrator<P: SpeechProvider, S: AudioSink> {
    provider: P,
    playback: PlaybackController<S>,
}

impl<P: SpeechProvider, S: AudioSink> Narrator<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self {
            provider,
            playback: PlaybackController::new(sink),
        }
    }

    /// Stop any playback.
    pub fn stop(&mut self) -> Option<MessageId> {
        self.playback.stop()
    }

    /// Start reading `text` for `message_id`, or stop if that message is
    /// the one already playing.
    ///
    /// A failure is reported only through the returned outcome.
    pub async fn toggle(&mut self, message_id: MessageId, text: &str, voice: Voice) -> NarrationOutcome {
        let was_playing = self.playback.playing();
        self.playback.stop();
        if was_playing == Some(message_id) {
            info!(message_id = %message_id, "Narration stopped");
            return NarrationOutcome::Stopped;
        }

        let request = SpeechRequest {
            text: text.to_string(),
            voice,
        };

        let result: Result<(), SpeechError> = async {
            let speech = self.provider.synthesize(&request).await?;
            let wav = wav_from_speech(&speech)?;
            self.playback.start(message_id, wav).await
        }
        .await;

        match result {
            Ok(()) => {
                info!(message_id = %message_id, %voice, provider = self.provider.name(), "Narration started");
                NarrationOutcome::Started
            }
            Err(e) => {
                let error = e.to_string();
                warn!(message_id = %message_id, error = %error, "Narration failed");
                NarrationOutcome::Failed { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use nexus_types::speech::SynthesizedSpeech;

    use crate::audio::playback::tests::{RecordingSink, SinkLog};

    struct MockSpeech {
        mime_type: String,
        requests: Mutex<Vec<SpeechRequest>>,
    }

    impl MockSpeech {
        fn new(mime_type: &str) -> Self {
            Self {
                mime_type: mime_type.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl SpeechProvider for MockSpeech {
        fn name(&self) -> &str {
            "mock"
        }

        async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedSpeech, SpeechError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(SynthesizedSpeech {
                mime_type: self.mime_type.clone(),
                pcm: vec![0x00, 0x00, 0xff, 0x7f],
            })
        }
    }

    fn narrator(mime_type: &str) -> (Narrator<MockSpeech, RecordingSink>, SinkLog) {
        let log = SinkLog::default();
        let narrator = Narrator::new(MockSpeech::new(mime_type), RecordingSink { log: log.clone() });
        (narrator, log)
    }

    #[tokio::test]
    async fn test_toggle_starts_playback_with_wav() {
        let (mut narrator, log) = narrator("audio/L16;codec=pcm;rate=24000");
        let id = MessageId::new();

        let outcome = narrator.toggle(id, "Hello", Voice::Puck).await;

        assert_eq!(outcome, NarrationOutcome::Started);
        assert_eq!(narrator.playback.playing(), Some(id));
        let wavs = log.wavs.lock().unwrap();
        assert_eq!(&wavs[0][0..4], b"RIFF");
        let requests = narrator.provider.requests.lock().unwrap();
        assert_eq!(requests[0].voice, Voice::Puck);
    }

    #[tokio::test]
    async fn test_second_toggle_on_same_message_stops() {
        let (mut narrator, log) = narrator("audio/L16;rate=24000");
        let id = MessageId::new();

        narrator.toggle(id, "Hello", Voice::Kore).await;
        let outcome = narrator.toggle(id, "Hello", Voice::Kore).await;

        assert_eq!(outcome, NarrationOutcome::Stopped);
        assert_eq!(narrator.playback.playing(), None);
        assert_eq!(log.started.load(Ordering::SeqCst), 1);
        assert_eq!(log.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_message_replaces_playback() {
        let (mut narrator, log) = narrator("audio/L16;rate=24000");
        let first = MessageId::new();
        let second = MessageId::new();

        narrator.toggle(first, "one", Voice::Kore).await;
        let outcome = narrator.toggle(second, "two", Voice::Kore).await;

        assert_eq!(outcome, NarrationOutcome::Started);
        assert_eq!(narrator.playback.playing(), Some(second));
        assert_eq!(log.started.load(Ordering::SeqCst), 2);
        assert_eq!(log.stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_audio_reported_in_outcome() {
        let (mut narrator, log) = narrator("application/json");
        let outcome = narrator.toggle(MessageId::new(), "Hello", Voice::Kore).await;

        assert_eq!(
            outcome,
            NarrationOutcome::Failed {
                error: "Invalid or empty audio data received from API.".to_string()
            }
        );
        assert_eq!(log.started.load(Ordering::SeqCst), 0);
        assert_eq!(narrator.playback.playing(), None);
    }
}
