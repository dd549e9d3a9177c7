//! SQLite-backed [`StateRepository`].

use chrono::Utc;
use nexus_core::storage::StateRepository;
use nexus_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

pub struct SqliteStateRepository {
    pool: DatabasePool,
}

impl SqliteStateRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl StateRepository for SqliteStateRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO app_state (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nexus_core::chat::SessionStore;
    use nexus_core::storage::SESSIONS_KEY;

    /// The returned `TempDir` must outlive the repository.
    async fn test_repo() -> (SqliteStateRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        (SqliteStateRepository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (repo, _dir) = test_repo().await;
        assert_eq!(repo.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (repo, _dir) = test_repo().await;
        repo.set("nexus.theme", "dark").await.unwrap();
        repo.set("nexus.theme", "light").await.unwrap();
        assert_eq!(repo.get("nexus.theme").await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (repo, dir) = test_repo().await;
        repo.set("nexus.theme", "light").await.unwrap();
        repo.set("nexus.tts_voice", "Puck").await.unwrap();
        assert_eq!(repo.get("nexus.theme").await.unwrap().as_deref(), Some("light"));
        assert_eq!(repo.get("nexus.tts_voice").await.unwrap().as_deref(), Some("Puck"));

        let path = dir.path().to_path_buf();
        drop(repo);
        drop(dir);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_session_store_round_trip_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();

        let active = {
            let pool = DatabasePool::open_in(dir.path()).await.unwrap();
            let mut store = SessionStore::load(SqliteStateRepository::new(pool)).await;
            store.append_user_message("Persist me").await;
            store.create_session().await;
            store.select_session_at(2).await.unwrap()
        };

        let pool = DatabasePool::open_in(dir.path()).await.unwrap();
        let repo = SqliteStateRepository::new(pool);
        assert!(repo.get(SESSIONS_KEY).await.unwrap().is_some());

        let store = SessionStore::load(repo).await;
        assert_eq!(store.sessions().len(), 2);
        assert_eq!(store.active_id(), active);
        assert_eq!(store.active().title, "Persist me");
    }
}
