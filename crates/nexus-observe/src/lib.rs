//! Observability for Nexus: subscriber setup and GenAI span conventions.

pub mod genai_attrs;
pub mod tracing_setup;
