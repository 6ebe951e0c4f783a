//! Redis backend: one JSON-string key per entry.
//!
//! The multiplexed connection is established once at construction; there is
//! no reconnection logic. The thread lookup walks every key under the prefix
//! (`KEYS` + `GET` per key) and filters client-side, the store's documented
//! full-scan policy: O(total entries), not O(matches).

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use crate::backend::ContextBackend;
use crate::error::MemoryError;
use crate::types::ContextEntry;

/// Networked backend over a Redis instance.
#[derive(Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
    prefix: String,
}

impl RedisBackend {
    /// Connects to `url` and holds the multiplexed connection for the
    /// backend's lifetime. Fails when the server is unreachable; the caller
    /// decides whether to fall back.
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, MemoryError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            prefix: prefix.to_string(),
        })
    }

    fn key(&self, id: Uuid) -> String {
        format!("{}{}", self.prefix, id)
    }
}

#[async_trait]
impl ContextBackend for RedisBackend {
    async fn write(&self, entry: &ContextEntry) -> Result<(), MemoryError> {
        let json = serde_json::to_string(entry)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.key(entry.id), json).await?;
        Ok(())
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContextEntry>, MemoryError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn by_thread(&self, thread_id: &str) -> Result<Vec<ContextEntry>, MemoryError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(format!("{}*", self.prefix)).await?;
        debug!(scanned = keys.len(), thread_id, "thread scan over redis keys");

        let mut entries = Vec::new();
        for key in keys {
            let raw: Option<String> = conn.get(&key).await?;
            if let Some(json) = raw {
                let entry: ContextEntry = serde_json::from_str(&json)?;
                if entry.thread_id.as_deref() == Some(thread_id) {
                    entries.push(entry);
                }
            }
        }
        Ok(entries)
    }
}
