//! In-process backend: a HashMap behind a tokio RwLock.
//!
//! Fast and dependency-free; data dies with the process. This is the default
//! backend when no Redis connection is configured, and what construction
//! falls back to when the configured Redis is unreachable.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::ContextBackend;
use crate::error::MemoryError;
use crate::types::ContextEntry;

/// In-process map backend.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<Uuid, ContextEntry>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContextBackend for InMemoryBackend {
    async fn write(&self, entry: &ContextEntry) -> Result<(), MemoryError> {
        let mut entries = self.entries.write().await;
        entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContextEntry>, MemoryError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&id).cloned())
    }

    /// Linear scan over all entries; acceptable at the cardinalities this
    /// store is designed for.
    async fn by_thread(&self, thread_id: &str) -> Result<Vec<ContextEntry>, MemoryError> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|e| e.thread_id.as_deref() == Some(thread_id))
            .cloned()
            .collect())
    }
}
