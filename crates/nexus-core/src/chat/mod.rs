//! Chat sessions: the session state machine, its persistent store, the
//! conversation payload builder, and the service that ties them to a
//! [`ChatProvider`].

pub mod book;
pub mod history;
pub mod provider;
pub mod service;
pub mod store;

pub use book::{derive_title, SessionBook};
pub use history::build_turns;
pub use provider::ChatProvider;
pub use service::{ChatService, SendOutcome};
pub use store::SessionStore;
