//! Write-through persistence for the session book.

use nexus_types::chat::{Citation, Message, Session, SessionId};
use nexus_types::error::RepositoryError;
use tracing::{debug, warn};

use super::book::SessionBook;
use crate::storage::{StateRepository, ACTIVE_SESSION_KEY, SESSIONS_KEY};

/// A [`SessionBook`] whose every committed mutation is written to a
/// [`StateRepository`].
///
/// Persistence failures are logged and otherwise ignored: the in-memory
/// state stays authoritative for the rest of the run.
pub struct SessionStore<R: StateRepository> {
    repo: R,
    book: SessionBook,
}

impl<R: StateRepository> SessionStore<R> {
    /// Restore sessions from `repo`.
    ///
    /// A missing, empty or corrupt snapshot starts a fresh book, and the
    /// repaired state is written back immediately so the stored active id
    /// always resolves.
    ///
    /// When the repository itself fails to answer, the book also starts
    /// fresh but nothing is written at load time, so stored sessions are
    /// left as they are.
    pub async fn load(repo: R) -> Self {
        let (sessions, write_back) = match read_sessions(&repo).await {
            Ok(sessions) => (sessions, true),
            Err(RepositoryError::Serialization(e)) => {
                warn!(error = %e, "Stored sessions are corrupt, starting fresh");
                (Vec::new(), true)
            }
            Err(e) => {
                warn!(error = %e, "Could not read stored sessions, leaving them untouched");
                (Vec::new(), false)
            }
        };

        let active = match repo.get(ACTIVE_SESSION_KEY).await {
            Ok(Some(raw)) => raw.parse::<SessionId>().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read active session id");
                None
            }
        };

        let book = SessionBook::restore(sessions, active);
        debug!(
            sessions = book.sessions().len(),
            active = %book.active_id(),
            "Session store loaded"
        );

        let store = Self { repo, book };
        if write_back {
            store.persist().await;
        }
        store
    }

    pub fn sessions(&self) -> &[Session] {
        self.book.sessions()
    }

    pub fn active(&self) -> &Session {
        self.book.active()
    }

    pub fn active_id(&self) -> SessionId {
        self.book.active_id()
    }

    pub async fn create_session(&mut self) -> SessionId {
        let id = self.book.create_session();
        self.persist().await;
        id
    }

    pub async fn select_session(&mut self, id: SessionId) -> bool {
        let selected = self.book.select_session(id);
        if selected {
            self.persist_active().await;
        }
        selected
    }

    pub async fn select_session_at(&mut self, position: usize) -> Option<SessionId> {
        let id = self.book.select_session_at(position)?;
        self.persist_active().await;
        Some(id)
    }

    pub async fn append_user_message(&mut self, text: &str) -> Message {
        let message = self.book.append_user_message(text);
        self.persist_sessions().await;
        message
    }

    pub async fn append_model_message(&mut self, text: &str, sources: Vec<Citation>) -> Message {
        let message = self.book.append_model_message(text, sources);
        self.persist_sessions().await;
        message
    }

    pub async fn clear_active_session(&mut self) {
        self.book.clear_active_session();
        self.persist_sessions().await;
    }

    pub async fn clear_all_sessions(&mut self) -> SessionId {
        let id = self.book.clear_all_sessions();
        self.persist().await;
        id
    }

    async fn persist(&self) {
        self.persist_sessions().await;
        self.persist_active().await;
    }

    async fn persist_sessions(&self) {
        let json = match serde_json::to_string(self.book.sessions()) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize sessions");
                return;
            }
        };
        if let Err(e) = self.repo.set(SESSIONS_KEY, &json).await {
            warn!(error = %e, "Failed to persist sessions");
        }
    }

    async fn persist_active(&self) {
        let id = self.book.active_id().to_string();
        if let Err(e) = self.repo.set(ACTIVE_SESSION_KEY, &id).await {
            warn!(error = %e, session_id = %id, "Failed to persist active session id");
        }
    }
}

async fn read_sessions<R: StateRepository>(repo: &R) -> Result<Vec<Session>, RepositoryError> {
    match repo.get(SESSIONS_KEY).await? {
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|e| RepositoryError::Serialization(e.to_string()))
        }
        None => Ok(Vec::new()),
    }
}
