//! Persisted display theme and speech voice.

use nexus_types::preferences::{Theme, Voice};
use tracing::{debug, warn};

use crate::storage::{StateRepository, THEME_KEY, VOICE_KEY};

/// Theme and voice selections, written through to the repository on every
/// change. Unknown stored values fall back to the defaults.
pub struct PreferenceService<R: StateRepository> {
    repo: R,
    theme: Theme,
    voice: Voice,
}

impl<R: StateRepository> PreferenceService<R> {
    pub async fn load(repo: R) -> Self {
        let theme = read_or_default::<_, Theme>(&repo, THEME_KEY).await;
        let voice = read_or_default::<_, Voice>(&repo, VOICE_KEY).await;
        debug!(%theme, %voice, "Preferences loaded");
        Self { repo, theme, voice }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub async fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled()).await;
        self.theme
    }

    pub async fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.write(THEME_KEY, &theme.to_string()).await;
    }

    pub async fn set_voice(&mut self, voice: Voice) {
        self.voice = voice;
        self.write(VOICE_KEY, voice.name()).await;
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.repo.set(key, value).await {
            warn!(key, error = %e, "Failed to persist preference");
        }
    }
}

async fn read_or_default<R, T>(repo: &R, key: &str) -> T
where
    R: StateRepository,
    T: std::str::FromStr + Default,
{
    match repo.get(key).await {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
            debug!(key, value = %raw, "Ignoring unrecognised stored preference");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "Could not read preference");
            T::default()
        }
    }
}
