//! Core types: document formats, classification records, dispatch requests and outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Document format tag produced by classification.
///
/// The closed tags cover formats the pipeline can route to a processor;
/// anything else round-trips through [`DocumentFormat::Other`] as the bare
/// string the classifier produced. Serializes as the lowercase string in
/// both cases (`"json"`, `"xml"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Email,
    Pdf,
    Unknown,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Json => f.write_str("json"),
            DocumentFormat::Email => f.write_str("email"),
            DocumentFormat::Pdf => f.write_str("pdf"),
            DocumentFormat::Unknown => f.write_str("unknown"),
            DocumentFormat::Other(s) => f.write_str(s),
        }
    }
}

/// Classification record: the routed format plus whatever opaque metadata
/// the classifier attached (hint, confidence, detected intent, ...).
/// Immutable once produced; persisted only as part of a context entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub format: DocumentFormat,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Classification {
    /// Classification with a format and no extra metadata.
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            details: Map::new(),
        }
    }
}

/// An uploaded file: original name (its extension drives the classification
/// hint) and raw bytes.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub content: Vec<u8>,
}

/// One dispatch request, mirroring the transport's three optional fields.
///
/// At least one of `file`, `json_text`, `email_text` must be populated; when
/// several are, precedence is file, then JSON text, then email text.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    pub file: Option<FileInput>,
    pub json_text: Option<String>,
    pub email_text: Option<String>,
    /// Conversation thread the resulting context entry is grouped under.
    pub thread_id: Option<String>,
}

impl DispatchRequest {
    /// Request carrying a file.
    pub fn from_file(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file: Some(FileInput {
                name: name.into(),
                content,
            }),
            ..Self::default()
        }
    }

    /// Request carrying raw JSON text.
    pub fn from_json(text: impl Into<String>) -> Self {
        Self {
            json_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Request carrying raw email text.
    pub fn from_email(text: impl Into<String>) -> Self {
        Self {
            email_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Groups the stored entry under a conversation thread.
    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// What a successful dispatch returns: the classification, the processor
/// result, and the id of the persisted context entry.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub classification: Classification,
    pub result: Map<String, Value>,
    pub entry_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_serializes_lowercase() {
        assert_eq!(serde_json::to_value(DocumentFormat::Json).unwrap(), json!("json"));
        assert_eq!(serde_json::to_value(DocumentFormat::Pdf).unwrap(), json!("pdf"));
        assert_eq!(
            serde_json::to_value(DocumentFormat::Other("xml".to_string())).unwrap(),
            json!("xml")
        );
    }

    #[test]
    fn test_format_deserializes_known_and_other() {
        let known: DocumentFormat = serde_json::from_value(json!("email")).unwrap();
        assert_eq!(known, DocumentFormat::Email);

        let other: DocumentFormat = serde_json::from_value(json!("xml")).unwrap();
        assert_eq!(other, DocumentFormat::Other("xml".to_string()));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(DocumentFormat::Unknown.to_string(), "unknown");
        assert_eq!(DocumentFormat::Other("csv".to_string()).to_string(), "csv");
    }

    #[test]
    fn test_classification_flattens_details() {
        let mut details = Map::new();
        details.insert("hint".to_string(), json!("pdf"));
        let classification = Classification {
            format: DocumentFormat::Pdf,
            details,
        };

        let value = serde_json::to_value(&classification).unwrap();
        assert_eq!(value, json!({"format": "pdf", "hint": "pdf"}));

        let back: Classification = serde_json::from_value(value).unwrap();
        assert_eq!(back.format, DocumentFormat::Pdf);
        assert_eq!(back.details.get("hint"), Some(&json!("pdf")));
    }
}
