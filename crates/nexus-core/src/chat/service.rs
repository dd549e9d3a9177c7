//! Chat orchestration: one user message in, one model message out.

use nexus_types::chat::Message;
use nexus_types::error::ChatError;
use nexus_types::llm::GenerateRequest;
use tracing::{info, warn};

use super::history::build_turns;
use super::provider::ChatProvider;
use super::store::SessionStore;
use crate::storage::StateRepository;

/// Prefix of the model message recorded when a request fails.
pub const FAILURE_PREFIX: &str = "Sorry, something went wrong:";

/// Result of a send that got as far as the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The model answered; the reply is already in the log.
    Replied(Message),
    /// The request failed; `message` is the apology recorded in the log.
    Failed { error: String, message: Message },
}

impl SendOutcome {
    /// The model-role message appended by this send.
    pub fn message(&self) -> &Message {
        match self {
            SendOutcome::Replied(message) => message,
            SendOutcome::Failed { message, .. } => message,
        }
    }
}

/// Owns the session store and a provider.
///
/// `send` borrows the service mutably, so only one request per service can
/// be in flight.
pub struct ChatService<R: StateRepository, P: ChatProvider> {
    store: SessionStore<R>,
    provider: P,
    system_instruction: String,
    web_search: bool,
    last_error: Option<String>,
}

impl<R: StateRepository, P: ChatProvider> ChatService<R, P> {
    pub fn new(
        store: SessionStore<R>,
        provider: P,
        system_instruction: impl Into<String>,
        web_search: bool,
    ) -> Self {
        Self {
            store,
            provider,
            system_instruction: system_instruction.into(),
            web_search,
            last_error: None,
        }
    }

    pub fn store(&self) -> &SessionStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore<R> {
        &mut self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Text of the most recent failed send, cleared by the next send.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Send `text` in the active session and record the outcome.
    ///
    /// Only blank input is an error. Provider failures are recorded as a
    /// model message and reported through [`SendOutcome::Failed`].
    pub async fn send(&mut self, text: &str) -> Result<SendOutcome, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.last_error = None;
        self.store.append_user_message(text).await;

        let request = GenerateRequest {
            turns: build_turns(&self.store.active().messages, text),
            system_instruction: self.system_instruction.clone(),
            web_search: self.web_search,
        };

        let session_id = self.store.active_id();
        info!(
            session_id = %session_id,
            provider = self.provider.name(),
            model = self.provider.model(),
            turns = request.turns.len(),
            "Sending chat request"
        );

        match self.provider.generate(&request).await {
            Ok(reply) => {
                info!(
                    session_id = %session_id,
                    citations = reply.citations.len(),
                    "Chat reply received"
                );
                let message = self
                    .store
                    .append_model_message(&reply.text, reply.citations)
                    .await;
                Ok(SendOutcome::Replied(message))
            }
            Err(e) => {
                let error = e.to_string();
                warn!(session_id = %session_id, error = %error, "Chat request failed");
                let message = self
                    .store
                    .append_model_message(&format!("{FAILURE_PREFIX} {error}"), Vec::new())
                    .await;
                self.last_error = Some(error.clone());
                Ok(SendOutcome::Failed { error, message })
            }
        }
    }
}
