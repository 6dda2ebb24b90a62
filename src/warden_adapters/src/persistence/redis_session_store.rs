use std::sync::Arc;

use redis::{Commands, Connection};
use tokio::sync::RwLock;
use warden_core::{SessionStore, SessionStoreError};

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: Arc<RwLock<Connection>>,
    session_ttl: u64,
}

impl RedisSessionStore {
    pub fn new(conn: Arc<RwLock<Connection>>, session_ttl: u64) -> Self {
        Self { conn, session_ttl }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionStoreError> {
        let key = get_key(session_id, key);
        let mut conn = self.conn.write().await;
        conn.get(&key)
            .map_err(|e| SessionStoreError::DatabaseError(e.to_string()))
    }

    async fn store(
        &self,
        session_id: &str,
        key: &str,
        value: String,
    ) -> Result<(), SessionStoreError> {
        let key = get_key(session_id, key);
        let mut conn = self.conn.write().await;
        conn.set_ex(key, value, self.session_ttl)
            .map_err(|e| SessionStoreError::DatabaseError(e.to_string()))
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionStoreError> {
        let key = get_key(session_id, key);
        let mut conn = self.conn.write().await;
        conn.del(key)
            .map_err(|e| SessionStoreError::DatabaseError(e.to_string()))
    }
}

// Key prefix keeps sessions apart from other data in a shared Redis.
const SESSION_KEY_PREFIX: &str = "session:";

fn get_key(session_id: &str, key: &str) -> String {
    format!("{}{}:{}", SESSION_KEY_PREFIX, session_id, key)
}
