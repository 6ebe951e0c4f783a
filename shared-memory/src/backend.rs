//! Persistence backend trait for the shared memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::MemoryError;
use crate::types::ContextEntry;

/// A key-value backend holding context entries.
///
/// Single-entry reads and writes must be atomic: a concurrent `read` sees
/// either the pre-write or the fully written entry, never a partial one.
/// Each entry lives under a single key, so the in-process lock and Redis
/// single-key SET/GET both satisfy this.
#[async_trait]
pub trait ContextBackend: Send + Sync {
    /// Writes (or overwrites) one entry under its id.
    async fn write(&self, entry: &ContextEntry) -> Result<(), MemoryError>;

    /// Reads one entry; `None` when the id is absent.
    async fn read(&self, id: Uuid) -> Result<Option<ContextEntry>, MemoryError>;

    /// Every entry whose `thread_id` equals the argument, unordered.
    ///
    /// Full scan on every implementation: O(total entries), not O(matches).
    async fn by_thread(&self, thread_id: &str) -> Result<Vec<ContextEntry>, MemoryError>;
}
