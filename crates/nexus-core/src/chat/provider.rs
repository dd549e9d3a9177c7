//! ChatProvider trait definition.

use nexus_types::llm::{GenerateRequest, LlmError, ModelReply};

/// A remote model that turns a conversation into one reply.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in nexus-infra (e.g., `GeminiChatProvider`).
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging and span attributes.
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate a single, complete reply.
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<ModelReply, LlmError>> + Send;
}
