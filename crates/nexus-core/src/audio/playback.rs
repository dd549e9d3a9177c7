//! Playback ports and the single-playback controller.

use nexus_types::chat::MessageId;
use nexus_types::speech::SpeechError;
use tracing::debug;

/// A running playback.
pub trait Playback: Send {
    /// Stop playing and release the underlying resources. Idempotent.
    fn stop(&mut self);

    /// Whether playback has run to completion on its own.
    fn is_finished(&mut self) -> bool;
}

/// Something that can play a WAV file.
///
/// Implementations live in nexus-infra (e.g., `CommandSink`).
pub trait AudioSink: Send + Sync {
    fn play(
        &self,
        wav: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<Box<dyn Playback>, SpeechError>> + Send;
}

/// Keeps at most one playback alive, tagged with the message it reads.
pub struct PlaybackController<S: AudioSink> {
    sink: S,
    current: Option<(MessageId, Box<dyn Playback>)>,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    /// Message currently being played, if playback is still running.
    pub fn playing(&mut self) -> Option<MessageId> {
        if let Some((id, playback)) = self.current.as_mut() {
            if playback.is_finished() {
                debug!(message_id = %id, "Playback finished");
                self.current = None;
            }
        }
        self.current.as_ref().map(|(id, _)| *id)
    }

    /// Stop the current playback, if any, and return which message it was.
    pub fn stop(&mut self) -> Option<MessageId> {
        let (id, mut playback) = self.current.take()?;
        playback.stop();
        debug!(message_id = %id, "Playback stopped");
        Some(id)
    }

    /// Stop anything playing, then start `wav` for `message_id`.
    pub async fn start(&mut self, message_id: MessageId, wav: Vec<u8>) -> Result<(), SpeechError> {
        self.stop();
        let playback = self.sink.play(wav).await?;
        debug!(message_id = %message_id, "Playback started");
        self.current = Some((message_id, playback));
        Ok(())
    }
}

impl<S: AudioSink> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
