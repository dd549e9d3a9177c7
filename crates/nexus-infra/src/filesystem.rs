//! Data directory layout.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "NEXUS_DATA_DIR";

/// File the most recent narration is written to before playback.
pub const LAST_REPLY_WAV: &str = "last_reply.wav";

/// Resolve the data directory.
///
/// Priority:
/// 1. `NEXUS_DATA_DIR` environment variable
/// 2. `~/.nexus`
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn data_dir_from(env_value: Option<String>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = home {
        return home.join(".nexus");
    }

    // Last resort: current directory
    PathBuf::from(".nexus")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}
