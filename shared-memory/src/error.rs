//! Store error types and update outcomes.

use thiserror::Error;
use uuid::Uuid;

/// Errors from shared memory operations.
///
/// Entry-not-found is deliberately not here: `get` reports it as `Ok(None)`
/// and `update` as [`UpdateOutcome::NotFound`]. A backend fault after
/// construction is fatal to the failing call and propagates unmodified.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("redis backend error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entry {id}: thread id is {existing:?}, patch supplies {requested:?}")]
    ThreadConflict {
        id: Uuid,
        existing: String,
        requested: String,
    },
}

/// Result of an update: applied, or the id was absent (nothing created).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NotFound,
}
