//! StateRepository trait definition.

use std::sync::Arc;

use nexus_types::error::RepositoryError;

/// String-keyed persistent storage for application state.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in nexus-infra (e.g., `SqliteStateRepository`).
pub trait StateRepository: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Lets the session store and preference service share one repository.
impl<R: StateRepository> StateRepository for Arc<R> {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        (**self).set(key, value)
    }
}
