//! In-memory session state machine.
//!
//! `SessionBook` owns the session collection and the active session id and
//! keeps two invariants: the collection is never empty, and the active id
//! always names a member of it.

use nexus_types::chat::{
    Citation, Message, Session, SessionId, CLEARED_TEXT, DEFAULT_TITLE,
};
use tracing::debug;

/// Titles are cut to this many characters.
pub const TITLE_MAX_CHARS: usize = 40;

/// Derive a session title from the first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends `...` when
/// anything was cut.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionBook {
    sessions: Vec<Session>,
    active: SessionId,
}

impl SessionBook {
    /// A book holding one fresh session.
    pub fn new() -> Self {
        let session = Session::new();
        let active = session.id;
        Self {
            sessions: vec![session],
            active,
        }
    }

    /// Rebuild a book from persisted parts, repairing anything that would
    /// break the invariants: empty collections get a default session, empty
    /// message logs get a greeting, and a missing or unknown active id falls
    /// back to the first session.
    pub fn restore(mut sessions: Vec<Session>, active: Option<SessionId>) -> Self {
        if sessions.is_empty() {
            debug!("No stored sessions, starting with a default session");
            return Self::new();
        }

        for session in sessions.iter_mut().filter(|s| s.messages.is_empty()) {
            debug!(session_id = %session.id, "Stored session had no messages, adding greeting");
            session.messages = Session::new().messages;
        }

        let active = match active {
            Some(id) if sessions.iter().any(|s| s.id == id) => id,
            stale => {
                debug!(stale = ?stale, "Active session id did not resolve, using first session");
                sessions[0].id
            }
        };

        Self { sessions, active }
    }

    /// Sessions in display order (newest first).
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn active_id(&self) -> SessionId {
        self.active
    }

    pub fn active(&self) -> &Session {
        &self.sessions[self.active_index()]
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn active_index(&self) -> usize {
        // The active id always resolves; index 0 is only reachable if that
        // invariant was broken, and the first session is the documented fallback.
        self.sessions
            .iter()
            .position(|s| s.id == self.active)
            .unwrap_or(0)
    }

    fn active_mut(&mut self) -> &mut Session {
        let index = self.active_index();
        &mut self.sessions[index]
    }

    /// Insert a fresh session at the front and make it active.
    pub fn create_session(&mut self) -> SessionId {
        let session = Session::new();
        let id = session.id;
        self.sessions.insert(0, session);
        self.active = id;
        id
    }

    /// Activate `id` if it is a member. Unknown ids are ignored and
    /// reported with `false`.
    pub fn select_session(&mut self, id: SessionId) -> bool {
        if self.get(id).is_some() {
            self.active = id;
            true
        } else {
            debug!(session_id = %id, "Ignoring selection of unknown session");
            false
        }
    }

    /// Activate the session at a 1-based position in display order.
    pub fn select_session_at(&mut self, position: usize) -> Option<SessionId> {
        let id = position
            .checked_sub(1)
            .and_then(|i| self.sessions.get(i))
            .map(|s| s.id)?;
        self.active = id;
        Some(id)
    }

    /// Append a user message to the active session.
    ///
    /// If the session is still in its initial single-greeting state the
    /// title is derived from `text`; later messages never touch the title.
    pub fn append_user_message(&mut self, text: &str) -> Message {
        let session = self.active_mut();
        if session.is_untouched() {
            session.title = derive_title(text);
        }
        let message = Message::user(text);
        session.messages.push(message.clone());
        message
    }

    /// Append a model message (reply or synthesized error) to the active
    /// session.
    pub fn append_model_message(&mut self, text: &str, sources: Vec<Citation>) -> Message {
        let message = Message::model(text, sources);
        self.active_mut().messages.push(message.clone());
        message
    }

    /// Reset the active session's log to a single notice and its title to
    /// the default. The session itself stays in the collection.
    pub fn clear_active_session(&mut self) {
        let session = self.active_mut();
        session.title = DEFAULT_TITLE.to_string();
        session.messages = vec![Message::model(CLEARED_TEXT, Vec::new())];
    }

    /// Replace the whole collection with one fresh, active session.
    pub fn clear_all_sessions(&mut self) -> SessionId {
        *self = Self::new();
        self.active
    }
}

impl Default for SessionBook {
    fn default() -> Self {
        Self::new()
    }
}
