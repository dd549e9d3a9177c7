//! Conversation payload construction.

use nexus_types::chat::{Message, Role};
use nexus_types::llm::Turn;

/// Map a session log to the turns sent to the model.
///
/// The remote API rejects histories that open with a model turn, so every
/// leading model message (the greeting or a reset notice) is dropped. When
/// nothing is left, a single user turn carrying `latest` is sent instead.
pub fn build_turns(messages: &[Message], latest: &str) -> Vec<Turn> {
    let turns: Vec<Turn> = messages
        .iter()
        .skip_while(|m| m.role == Role::Model)
        .map(|m| Turn {
            role: m.role,
            text: m.text.clone(),
        })
        .collect();

    if turns.is_empty() {
        vec![Turn::user(latest)]
    } else {
        turns
    }
}
