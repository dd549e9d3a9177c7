//! OpenTelemetry GenAI Semantic Convention values.
//!
//! Field names (`gen_ai.operation.name`, `gen_ai.provider.name`, ...) are
//! written literally in `info_span!` calls since tracing needs them at
//! compile time; the constants below are the values those fields take.
//!
//! Span naming convention: `"{operation} {model}"` (e.g.,
//! `"chat gemini-2.5-flash-preview-09-2025"`).

// --- Operation name values ---

/// Chat completion.
pub const OP_CHAT: &str = "chat";

/// Text-to-speech synthesis.
pub const OP_SPEECH: &str = "text_to_speech";

// --- Provider name values ---

pub const PROVIDER_GEMINI: &str = "gemini";

/// Span name for an operation against a model.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}
