//! Infrastructure layer for Nexus.
//!
//! Contains implementations of the ports defined in `nexus-core`: the
//! reqwest HTTP transport, the Gemini chat and speech providers, SQLite
//! state storage, the command-line audio sink, plus config and data
//! directory resolution.

pub mod audio;
pub mod config;
pub mod filesystem;
pub mod gemini;
pub mod http;
pub mod sqlite;
