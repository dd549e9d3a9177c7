//! GeminiSpeechProvider -- [`SpeechProvider`] over the TTS model.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use nexus_core::http::{HttpTransport, ResilientExecutor};
use nexus_core::speech::SpeechProvider;
use nexus_observe::genai_attrs::{span_name, OP_SPEECH, PROVIDER_GEMINI};
use nexus_types::http::RetryPolicy;
use nexus_types::speech::{SpeechError, SpeechRequest, SynthesizedSpeech};
use secrecy::SecretString;
use tracing::{debug, info_span, Instrument};

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use super::{authorized_post, generate_content_url, parse_response};

/// Prompt framing that makes the TTS model read the text verbatim.
const READ_ALOUD_PREFIX: &str = "Read the following message:";

pub struct GeminiSpeechProvider<T: HttpTransport> {
    executor: ResilientExecutor<T>,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl<T: HttpTransport> GeminiSpeechProvider<T> {
    pub fn new(
        transport: T,
        policy: RetryPolicy,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            executor: ResilientExecutor::new(transport, policy),
            api_key,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

fn to_gemini_request(request: &SpeechRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::text(
            None,
            format!("{READ_ALOUD_PREFIX} {}", request.text),
        )],
        system_instruction: None,
        tools: Vec::new(),
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: request.voice.name().to_string(),
                    },
                },
            },
        }),
    }
}

fn extract_audio(response: GenerateContentResponse) -> Result<SynthesizedSpeech, SpeechError> {
    if let Some(error) = &response.error {
        return Err(SpeechError::Api {
            message: error.describe(),
        });
    }

    let inline = response
        .first_part()
        .and_then(|part| part.inline_data.as_ref())
        .ok_or(SpeechError::InvalidAudio)?;

    let (Some(data), Some(mime_type)) = (inline.data.as_deref(), inline.mime_type.as_deref()) else {
        return Err(SpeechError::InvalidAudio);
    };
    if data.is_empty() || !mime_type.starts_with("audio/") {
        return Err(SpeechError::InvalidAudio);
    }

    let pcm = BASE64.decode(data).map_err(|e| {
        debug!(error = %e, "Audio payload was not valid base64");
        SpeechError::InvalidAudio
    })?;

    Ok(SynthesizedSpeech {
        mime_type: mime_type.to_string(),
        pcm,
    })
}

impl<T: HttpTransport> SpeechProvider for GeminiSpeechProvider<T> {
    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedSpeech, SpeechError> {
        let span = info_span!(
            "gen_ai.speech",
            otel.name = %span_name(OP_SPEECH, &self.model),
            gen_ai.operation.name = OP_SPEECH,
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            voice = request.voice.name(),
        );

        async {
            let body = serde_json::to_value(to_gemini_request(request))
                .map_err(|_| SpeechError::InvalidAudio)?;
            let http_request =
                authorized_post(generate_content_url(&self.base_url, &self.model), body, &self.api_key);

            let raw = self.executor.execute(&http_request).await?;
            let response = parse_response(raw).map_err(|e| {
                debug!(error = %e, "Speech response did not match the expected shape");
                SpeechError::InvalidAudio
            })?;

            let speech = extract_audio(response)?;
            debug!(bytes = speech.pcm.len(), mime_type = %speech.mime_type, "Speech synthesized");
            Ok(speech)
        }
        .instrument(span)
        .await
    }
}
