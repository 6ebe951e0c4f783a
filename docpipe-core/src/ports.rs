//! Collaborator ports consumed by the dispatcher.
//!
//! The pipeline does not classify or parse content itself; it drives these
//! traits. Implementations live with the caller (the CLI ships baseline
//! ones) and report failures as `anyhow::Error` so the dispatcher can
//! surface them with the original cause preserved.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::types::Classification;

/// Determines the format of a byte stream.
///
/// `hint` is caller-derived: the lowercased file extension for file inputs,
/// or the fixed tags `"json"` / `"email"` for raw text inputs. Must not
/// mutate `content`.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, content: &[u8], hint: &str) -> anyhow::Result<Classification>;
}

/// Extracts structured data from content of one specific format.
///
/// The returned mapping becomes the `result` field of the persisted context
/// entry.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, content: &[u8]) -> anyhow::Result<Map<String, Value>>;
}
