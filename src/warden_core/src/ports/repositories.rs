use async_trait::async_trait;
use thiserror::Error;

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Key-value storage scoped to a caller's browser session.
///
/// Implementations synchronise internally and are shared between requests.
/// Concurrent writes to the same session are not arbitrated: last write wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionStoreError>;
    async fn store(
        &self,
        session_id: &str,
        key: &str,
        value: String,
    ) -> Result<(), SessionStoreError>;
    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionStoreError>;
}
