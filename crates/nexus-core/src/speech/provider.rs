//! SpeechProvider trait definition.

use nexus_types::speech::{SpeechError, SpeechRequest, SynthesizedSpeech};

/// A remote text-to-speech model.
///
/// Implementations live in nexus-infra (e.g., `GeminiSpeechProvider`).
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Synthesize `request.text` with `request.voice` as raw PCM.
    fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> impl std::future::Future<Output = Result<SynthesizedSpeech, SpeechError>> + Send;
}
