//! SQLite storage.

pub mod pool;
pub mod state;

pub use pool::DatabasePool;
pub use state::SqliteStateRepository;
