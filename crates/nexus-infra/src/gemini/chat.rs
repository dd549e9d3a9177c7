//! GeminiChatProvider -- [`ChatProvider`] over `generateContent` with
//! optional web-search grounding.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when the
//! request header is built; the header itself is marked sensitive so it is
//! redacted from `Debug` output.

use nexus_core::chat::ChatProvider;
use nexus_core::http::{HttpTransport, ResilientExecutor};
use nexus_observe::genai_attrs::{span_name, OP_CHAT, PROVIDER_GEMINI};
use nexus_types::chat::Citation;
use nexus_types::llm::{GenerateRequest, LlmError, ModelReply};
use nexus_types::http::RetryPolicy;
use secrecy::SecretString;
use tracing::{debug, info_span, Instrument};

use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GoogleSearch, Tool};
use super::{authorized_post, generate_content_url, parse_response};

pub struct GeminiChatProvider<T: HttpTransport> {
    executor: ResilientExecutor<T>,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl<T: HttpTransport> GeminiChatProvider<T> {
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

    fn to_gemini_request(&self, request: &GenerateRequest) -> GenerateContentRequest {
        let contents = request
            .turns
            .iter()
            .map(|turn| Content::text(Some(turn.role.to_string().as_str()), turn.text.clone()))
            .collect();

        let tools = if request.web_search {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, request.system_instruction.clone())),
            tools,
            generation_config: None,
        }
    }
}

/// Pull the reply text and usable citations out of a response body.
fn extract_reply(response: GenerateContentResponse) -> Result<ModelReply, LlmError> {
    if let Some(error) = &response.error {
        return Err(LlmError::Api {
            message: error.describe(),
        });
    }

    let text = response
        .first_part()
        .and_then(|part| part.text.clone())
        .filter(|text| !text.is_empty())
        .ok_or(LlmError::EmptyResponse)?;

    let citations = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|meta| {
            meta.grounding_attributions
                .iter()
                .filter_map(|attr| attr.web.as_ref())
                .filter_map(|web| Citation::from_parts(web.uri.as_deref(), web.title.as_deref()))
                .collect()
        })
        .unwrap_or_default();

    Ok(ModelReply { text, citations })
}

impl<T: HttpTransport> ChatProvider for GeminiChatProvider<T> {
    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply, LlmError> {
        let span = info_span!(
            "gen_ai.chat",
            otel.name = %span_name(OP_CHAT, &self.model),
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            gen_ai.response.citations = tracing::field::Empty,
        );

        async {
            let body = serde_json::to_value(self.to_gemini_request(request))
                .map_err(|e| LlmError::Deserialization(format!("failed to encode request: {e}")))?;
            let http_request =
                authorized_post(generate_content_url(&self.base_url, &self.model), body, &self.api_key);

            let raw = self.executor.execute(&http_request).await?;
            let response = parse_response(raw)
                .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

            let reply = extract_reply(response)?;
            tracing::Span::current().record("gen_ai.response.citations", reply.citations.len());
            debug!(chars = reply.text.len(), "Gemini chat reply parsed");
            Ok(reply)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use nexus_types::error::ExecutorError;
    use nexus_types::llm::Turn;
    use serde_json::json;

    use crate::gemini::testing::CannedTransport;
    use crate::gemini::API_KEY_HEADER;

    fn provider(transport: CannedTransport) -> GeminiChatProvider<CannedTransport> {
        let policy = RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(10),
        };
        GeminiChatProvider::new(
            transport,
            policy,
            SecretString::from("test-key-not-real"),
            "https://example.test/v1beta",
            "gemini-test",
        )
    }

    fn request(web_search: bool) -> GenerateRequest {
        GenerateRequest {
            turns: vec![Turn::user("hi"), Turn::model("hello"), Turn::user("news?")],
            system_instruction: "Be helpful.".to_string(),
            web_search,
        }
    }

    #[tokio::test]
    async fn test_request_shape() {
        let p = provider(CannedTransport::json(
            200,
            json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}),
        ));
        p.generate(&request(true)).await.unwrap();

        let sent = p.executor.transport().last();
        assert_eq!(
            sent.url,
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
        let key = sent.headers.iter().find(|h| h.name == API_KEY_HEADER).unwrap();
        assert_eq!(key.value, "test-key-not-real");
        assert!(key.sensitive);

        let body = sent.body.unwrap();
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "news?");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be helpful.");
        assert_eq!(body["tools"], json!([{"google_search": {}}]));
    }

    #[tokio::test]
    async fn test_tools_omitted_without_web_search() {
        let p = provider(CannedTransport::json(
            200,
            json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}),
        ));
        p.generate(&request(false)).await.unwrap();
        let body = p.executor.transport().last().body.unwrap();
        assert!(body.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_citations_filtered_to_complete_entries() {
        let p = provider(CannedTransport::json(
            200,
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Here is the news."}]},
                    "groundingMetadata": {
                        "groundingAttributions": [
                            {"web": {"uri": "a", "title": "A"}},
                            {"web": {"uri": "b"}},
                            {}
                        ]
                    }
                }]
            }),
        ));

        let reply = p.generate(&request(true)).await.unwrap();
        assert_eq!(reply.text, "Here is the news.");
        assert_eq!(
            reply.citations,
            vec![Citation {
                uri: "a".to_string(),
                title: "A".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_uri_and_missing_title_dropped() {
        let p = provider(CannedTransport::json(
            200,
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Sources below."}]},
                    "groundingMetadata": {
                        "groundingAttributions": [
                            {"web": {"uri": "a", "title": "A"}},
                            {"web": {"uri": "", "title": "B"}},
                            {"web": {"uri": "c"}}
                        ]
                    }
                }]
            }),
        ));

        let reply = p.generate(&request(true)).await.unwrap();
        assert_eq!(
            reply.citations,
            vec![Citation {
                uri: "a".to_string(),
                title: "A".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_embedded_error_becomes_api_error() {
        let p = provider(CannedTransport::json(
            400,
            json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}),
        ));
        let err = p.generate(&request(true)).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { ref message } if message == "API key not valid."));
        assert_eq!(p.executor.transport().seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let p = provider(CannedTransport::json(200, json!({"candidates": []})));
        let err = p.generate(&request(true)).await.unwrap_err();
        assert_eq!(err.to_string(), "Received empty chat content from the API.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_executor_error() {
        let transport = CannedTransport::new(vec![
            Ok(nexus_types::http::HttpResponse {
                status: 503,
                body: "{}".to_string(),
            }),
            Ok(nexus_types::http::HttpResponse {
                status: 503,
                body: "{}".to_string(),
            }),
        ]);
        let err = provider(transport).generate(&request(true)).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::Request(ExecutorError::MaxRetriesExceeded { attempts: 2 })
        ));
    }
}
