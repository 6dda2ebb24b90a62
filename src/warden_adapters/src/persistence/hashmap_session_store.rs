use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use warden_core::{SessionStore, SessionStoreError};

type SessionKey = (String, String);

/// Process-local session storage. Sessions are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct HashMapSessionStore {
    values: Arc<RwLock<HashMap<SessionKey, String>>>,
}

impl HashMapSessionStore {
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn session_key(session_id: &str, key: &str) -> SessionKey {
    (session_id.to_owned(), key.to_owned())
}

#[async_trait::async_trait]
impl SessionStore for HashMapSessionStore {
    async fn load(&self, session_id: &str, key: &str) -> Result<Option<String>, SessionStoreError> {
        let values = self.values.read().await;
        Ok(values.get(&session_key(session_id, key)).cloned())
    }

    async fn store(
        &self,
        session_id: &str,
        key: &str,
        value: String,
    ) -> Result<(), SessionStoreError> {
        let mut values = self.values.write().await;
        values.insert(session_key(session_id, key), value);
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), SessionStoreError> {
        let mut values = self.values.write().await;
        values.remove(&session_key(session_id, key));
        Ok(())
    }
}
