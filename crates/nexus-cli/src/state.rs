//! Application state wiring services together.
//!
//! Services in nexus-core are generic over their ports; AppState pins them
//! to the concrete infra implementations and owns the shared pieces (data
//! directory, config, state repository, credentials).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use nexus_core::chat::{ChatService, SessionStore};
use nexus_core::preferences::PreferenceService;
use nexus_core::speech::Narrator;
use nexus_infra::audio::CommandSink;
use nexus_infra::config::load_config;
use nexus_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use nexus_infra::gemini::{GeminiChatProvider, GeminiSpeechProvider};
use nexus_infra::http::ReqwestTransport;
use nexus_infra::sqlite::{DatabasePool, SqliteStateRepository};
use nexus_types::config::NexusConfig;

/// The state repository shared by the session store and preferences.
pub type SharedRepo = Arc<SqliteStateRepository>;

pub type ConcreteChatService = ChatService<SharedRepo, GeminiChatProvider<ReqwestTransport>>;

pub type ConcreteNarrator = Narrator<GeminiSpeechProvider<ReqwestTransport>, CommandSink>;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: NexusConfig,
    pub repo: SharedRepo,
    pub preferences: PreferenceService<SharedRepo>,
    api_key: Option<SecretString>,
}

impl AppState {
    /// Resolve the data directory, load config, open the database.
    pub async fn init(api_key: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let pool = DatabasePool::open_in(&data_dir)
            .await
            .with_context(|| format!("Failed to open database in {}", data_dir.display()))?;
        let repo = Arc::new(SqliteStateRepository::new(pool));
        let preferences = PreferenceService::load(repo.clone()).await;

        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            data_dir,
            config,
            repo,
            preferences,
            api_key,
        })
    }

    /// Load the persisted sessions.
    pub async fn session_store(&self) -> SessionStore<SharedRepo> {
        SessionStore::load(self.repo.clone()).await
    }

    fn require_api_key(&self) -> anyhow::Result<SecretString> {
        self.api_key.clone().ok_or_else(|| {
            anyhow::anyhow!("GEMINI_API_KEY not set. Pass --api-key or export GEMINI_API_KEY.")
        })
    }

    fn transport(&self) -> anyhow::Result<ReqwestTransport> {
        Ok(ReqwestTransport::new(Duration::from_secs(
            self.config.request_timeout_secs,
        ))?)
    }

    /// Chat service over the persisted sessions.
    pub async fn chat_service(&self) -> anyhow::Result<ConcreteChatService> {
        let provider = GeminiChatProvider::new(
            self.transport()?,
            self.config.retry.into(),
            self.require_api_key()?,
            self.config.base_url.clone(),
            self.config.chat_model.clone(),
        );
        Ok(ChatService::new(
            self.session_store().await,
            provider,
            self.config.system_prompt.clone(),
            self.config.web_search,
        ))
    }

    /// Narrator writing audio into the data directory.
    pub fn narrator(&self) -> anyhow::Result<ConcreteNarrator> {
        let provider = GeminiSpeechProvider::new(
            self.transport()?,
            self.config.retry.into(),
            self.require_api_key()?,
            self.config.base_url.clone(),
            self.config.speech_model.clone(),
        );
        let sink = CommandSink::new(self.data_dir.clone(), self.config.player_command.clone());
        Ok(Narrator::new(provider, sink))
    }
}
