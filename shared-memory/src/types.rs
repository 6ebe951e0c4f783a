//! The context entry: the unit persisted by the shared memory store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Keys the store manages itself. Stripped from caller payloads and patches
/// so the flattened record cannot be spoofed.
pub const RESERVED_KEYS: [&str; 4] = ["id", "created_at", "updated_at", "thread_id"];

/// A persisted record of one processing outcome plus metadata.
///
/// Serializes to the backend-neutral shape
/// `{id, created_at, updated_at?, thread_id?, ...payload fields}` with
/// RFC 3339 timestamps, identical on both backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Unique identifier, generated at creation, never reused.
    pub id: Uuid,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Absent until the first update, refreshed on every update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Caller-supplied conversation grouping key; immutable once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Open string-keyed payload (classification, result, caller fields).
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ContextEntry {
    /// Creates an entry with a fresh v4 id and creation timestamp.
    /// Reserved keys in the payload are dropped.
    pub fn new(mut payload: Map<String, Value>, thread_id: Option<String>) -> Self {
        strip_reserved(&mut payload);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
            thread_id,
            payload,
        }
    }
}

/// Removes the store-managed keys from a caller-supplied mapping.
pub(crate) fn strip_reserved(payload: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        payload.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_strips_reserved_keys() {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!("spoofed"));
        payload.insert("created_at".to_string(), json!("1970-01-01T00:00:00Z"));
        payload.insert("kind".to_string(), json!("invoice"));

        let entry = ContextEntry::new(payload, None);
        assert!(!entry.payload.contains_key("id"));
        assert!(!entry.payload.contains_key("created_at"));
        assert_eq!(entry.payload.get("kind"), Some(&json!("invoice")));
    }

    #[test]
    fn test_serializes_flat_with_optional_fields_omitted() {
        let mut payload = Map::new();
        payload.insert("kind".to_string(), json!("invoice"));
        let entry = ContextEntry::new(payload, Some("t1".to_string()));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], json!(entry.id.to_string()));
        assert_eq!(value["thread_id"], json!("t1"));
        assert_eq!(value["kind"], json!("invoice"));
        assert!(value.get("updated_at").is_none());

        let back: ContextEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.thread_id.as_deref(), Some("t1"));
        assert_eq!(back.payload.get("kind"), Some(&json!("invoice")));
    }
}
