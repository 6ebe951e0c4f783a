//! The shared memory store: id generation, the last-written-id pointer,
//! shallow-merge updates, and conversation-thread lookup over a backend
//! chosen once at construction.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::backend::ContextBackend;
use crate::config::MemoryConfig;
use crate::error::{MemoryError, UpdateOutcome};
use crate::inmemory::InMemoryBackend;
use crate::redis_backend::RedisBackend;
use crate::types::{strip_reserved, ContextEntry};

/// Shared store of processing context, used concurrently by every dispatch
/// call in the process. Construct one instance at startup and hand it out
/// behind an `Arc`; it holds no external resources beyond the optional
/// backend connection, so no teardown is needed.
pub struct SharedMemory {
    backend: Arc<dyn ContextBackend>,
    last_id: RwLock<Option<Uuid>>,
}

impl SharedMemory {
    /// Store over the in-process map backend.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(InMemoryBackend::new()))
    }

    /// Store over an explicit backend. Lets tests force either variant
    /// deterministically.
    pub fn with_backend(backend: Arc<dyn ContextBackend>) -> Self {
        Self {
            backend,
            last_id: RwLock::new(None),
        }
    }

    /// Backend selection happens here, exactly once: with `redis_url` set
    /// the store probes Redis, and on failure logs the degradation and runs
    /// on the in-process map for the rest of the process lifetime. No retry
    /// loop, no later reconnection.
    pub async fn from_config(config: &MemoryConfig) -> Self {
        match &config.redis_url {
            Some(url) => match RedisBackend::connect(url, &config.key_prefix).await {
                Ok(backend) => {
                    info!("connected to redis for shared memory");
                    Self::with_backend(Arc::new(backend))
                }
                Err(e) => {
                    error!(
                        error = %e,
                        "failed to connect to redis, falling back to in-memory storage"
                    );
                    Self::in_memory()
                }
            },
            None => {
                info!("using in-memory storage for shared memory");
                Self::in_memory()
            }
        }
    }

    /// Persists a new entry and returns its id.
    ///
    /// Reserved keys in the payload are dropped; `thread_id` travels as the
    /// explicit argument. The last-written-id pointer moves only after the
    /// backend write succeeds; a backend fault propagates and leaves the
    /// pointer untouched.
    pub async fn store(
        &self,
        payload: Map<String, Value>,
        thread_id: Option<String>,
    ) -> Result<Uuid, MemoryError> {
        let entry = ContextEntry::new(payload, thread_id);
        let id = entry.id;
        self.backend.write(&entry).await?;
        *self.last_id.write().await = Some(id);
        debug!(%id, "stored entry in shared memory");
        Ok(id)
    }

    /// Reads one entry; `Ok(None)` when the id is absent.
    pub async fn get(&self, id: Uuid) -> Result<Option<ContextEntry>, MemoryError> {
        self.backend.read(id).await
    }

    /// Shallow-merges `patch` into an existing entry.
    ///
    /// Patch keys overwrite, absent keys are preserved, reserved keys are
    /// ignored, and `updated_at` is refreshed. A patch may add `thread_id`
    /// to an entry that has none or repeat the existing value; a different
    /// value is rejected with [`MemoryError::ThreadConflict`] and the entry
    /// is left untouched. Returns [`UpdateOutcome::NotFound`], creating
    /// nothing, when the id is absent. Does not move the last-written-id
    /// pointer.
    ///
    /// Read and write are not atomic across the backend: two concurrent
    /// updates race and the last write wins.
    pub async fn update(
        &self,
        id: Uuid,
        mut patch: Map<String, Value>,
    ) -> Result<UpdateOutcome, MemoryError> {
        let Some(mut entry) = self.backend.read(id).await? else {
            debug!(%id, "entry not found for update");
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(Value::String(requested)) = patch.remove("thread_id") {
            match &entry.thread_id {
                None => entry.thread_id = Some(requested),
                Some(existing) if *existing == requested => {}
                Some(existing) => {
                    return Err(MemoryError::ThreadConflict {
                        id,
                        existing: existing.clone(),
                        requested,
                    });
                }
            }
        }

        strip_reserved(&mut patch);
        for (key, value) in patch {
            entry.payload.insert(key, value);
        }
        entry.updated_at = Some(Utc::now());

        self.backend.write(&entry).await?;
        debug!(%id, "updated entry in shared memory");
        Ok(UpdateOutcome::Applied)
    }

    /// Id returned by the most recent successful [`store`](Self::store) on
    /// this instance, if any. Valid only within this instance's lifetime;
    /// not moved by [`update`](Self::update).
    pub async fn last_id(&self) -> Option<Uuid> {
        *self.last_id.read().await
    }

    /// Every entry in a conversation thread, unordered; empty for an unused
    /// thread id.
    ///
    /// Full scan over all entries on both backends, O(total entries), not
    /// O(matches). Keep it off hot paths without a cardinality bound.
    pub async fn entries_by_thread(
        &self,
        thread_id: &str,
    ) -> Result<Vec<ContextEntry>, MemoryError> {
        self.backend.by_thread(thread_id).await
    }
}
