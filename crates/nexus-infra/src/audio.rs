//! Audio sink that hands WAV files to an external player.

use std::path::PathBuf;

use nexus_core::audio::{AudioSink, Playback};
use nexus_types::speech::SpeechError;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::filesystem::LAST_REPLY_WAV;

/// Writes each WAV to `{data_dir}/last_reply.wav` and, when a player
/// command is configured, spawns it with the file path as the last
/// argument.
///
/// The file is written under a staging name and renamed into place, so a
/// player that is still shutting down keeps reading the previous, complete
/// file.
pub struct CommandSink {
    output: PathBuf,
    staging: PathBuf,
    player: Option<Vec<String>>,
}

impl CommandSink {
    pub fn new(data_dir: impl Into<PathBuf>, player: Option<Vec<String>>) -> Self {
        let player = player.filter(|argv| !argv.is_empty());
        let data_dir = data_dir.into();
        Self {
            output: data_dir.join(LAST_REPLY_WAV),
            staging: data_dir.join(format!("{LAST_REPLY_WAV}.partial")),
            player,
        }
    }

    async fn write_wav(&self, wav: &[u8]) -> Result<(), SpeechError> {
        tokio::fs::write(&self.staging, wav)
            .await
            .map_err(|e| SpeechError::Playback(format!("failed to write {}: {e}", self.staging.display())))?;
        tokio::fs::rename(&self.staging, &self.output)
            .await
            .map_err(|e| SpeechError::Playback(format!("failed to replace {}: {e}", self.output.display())))
    }
}

impl AudioSink for CommandSink {
    async fn play(&self, wav: Vec<u8>) -> Result<Box<dyn Playback>, SpeechError> {
        self.write_wav(&wav).await?;
        debug!(path = %self.output.display(), bytes = wav.len(), "WAV written");

        let Some(argv) = &self.player else {
            return Ok(Box::new(FileOnly));
        };
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SpeechError::Playback("empty player command".to_string()))?;

        let child = Command::new(program)
            .args(args)
            .arg(&self.output)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Playback(format!("failed to start {program}: {e}")))?;

        debug!(program = %program, pid = ?child.id(), "Player started");
        Ok(Box::new(ChildPlayback { child }))
    }
}

/// Playback when no player is configured: the file is written, nothing runs.
struct FileOnly;

impl Playback for FileOnly {
    fn stop(&mut self) {}

    fn is_finished(&mut self) -> bool {
        true
    }
}

struct ChildPlayback {
    child: Child,
}

impl Playback for ChildPlayback {
    fn stop(&mut self) {
        if let Err(e) = self.child.start_kill() {
            // Already exited.
            debug!(error = %e, "Player kill skipped");
        }
    }

    fn is_finished(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Could not poll player process");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_player_only_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CommandSink::new(tmp.path(), None);

        let mut playback = sink.play(b"RIFFdata".to_vec()).await.unwrap();

        assert!(playback.is_finished());
        assert_eq!(std::fs::read(tmp.path().join(LAST_REPLY_WAV)).unwrap(), b"RIFFdata");
        assert!(!tmp.path().join("last_reply.wav.partial").exists());
    }

    #[tokio::test]
    async fn test_empty_player_command_treated_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CommandSink::new(tmp.path(), Some(Vec::new()));
        let mut playback = sink.play(b"RIFF".to_vec()).await.unwrap();
        assert!(playback.is_finished());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_replacing_file_leaves_open_reader_intact() {
        use std::io::Read;

        let tmp = tempfile::tempdir().unwrap();
        let sink = CommandSink::new(tmp.path(), None);
        sink.play(b"first reply".to_vec()).await.unwrap();

        // Stands in for a player that has not closed the old file yet.
        let mut reader = std::fs::File::open(tmp.path().join(LAST_REPLY_WAV)).unwrap();
        sink.play(b"second reply, longer".to_vec()).await.unwrap();

        let mut old = Vec::new();
        reader.read_to_end(&mut old).unwrap();
        assert_eq!(old, b"first reply");
        assert_eq!(
            std::fs::read(tmp.path().join(LAST_REPLY_WAV)).unwrap(),
            b"second reply, longer"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_kills_player() {
        let tmp = tempfile::tempdir().unwrap();
        // The WAV path lands in `$0` and is ignored.
        let sink = CommandSink::new(
            tmp.path(),
            Some(vec!["sh".to_string(), "-c".to_string(), "sleep 30".to_string()]),
        );

        let mut playback = sink.play(vec![0; 4]).await.unwrap();
        assert!(!playback.is_finished());

        playback.stop();
        let mut finished = false;
        for _ in 0..50 {
            if playback.is_finished() {
                finished = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(finished);
    }

    #[tokio::test]
    async fn test_missing_player_binary_is_playback_error() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CommandSink::new(
            tmp.path(),
            Some(vec!["nexus-player-that-does-not-exist".to_string()]),
        );
        let err = sink.play(vec![0; 4]).await.err().unwrap();
        assert!(matches!(err, SpeechError::Playback(_)));
    }
}
