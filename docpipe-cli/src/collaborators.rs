//! Baseline collaborator implementations behind the core's port traits.
//!
//! The dispatcher only consumes [`Classifier`] and [`Processor`]; these are
//! the implementations the CLI wires in. Classification is hint-driven with
//! light content sniffing; processors do plain extraction, enough to
//! exercise the pipeline end to end.

use async_trait::async_trait;
use serde_json::{Map, Value};

use docpipe_core::{Classification, Classifier, DocumentFormat, Processor};

/// Classifies by hint (file extension or the fixed "json"/"email" tags),
/// sniffing content when the hint alone does not settle it.
pub struct ExtensionClassifier;

#[async_trait]
impl Classifier for ExtensionClassifier {
    async fn classify(&self, content: &[u8], hint: &str) -> anyhow::Result<Classification> {
        let format = match hint {
            "json" => DocumentFormat::Json,
            "email" | "eml" => DocumentFormat::Email,
            "pdf" => DocumentFormat::Pdf,
            "" => sniff(content),
            other => match sniff(content) {
                DocumentFormat::Unknown => DocumentFormat::Other(other.to_string()),
                sniffed => sniffed,
            },
        };

        let mut details = Map::new();
        details.insert("hint".to_string(), Value::String(hint.to_string()));
        Ok(Classification { format, details })
    }
}

/// Content sniffing: PDF magic bytes, then a leading JSON token.
fn sniff(content: &[u8]) -> DocumentFormat {
    if content.starts_with(b"%PDF") {
        return DocumentFormat::Pdf;
    }
    let text = String::from_utf8_lossy(content);
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return DocumentFormat::Json;
    }
    DocumentFormat::Unknown
}

/// Parses the content as JSON and returns it under `parsed`.
pub struct JsonProcessor;

#[async_trait]
impl Processor for JsonProcessor {
    async fn process(&self, content: &[u8]) -> anyhow::Result<Map<String, Value>> {
        let parsed: Value = serde_json::from_slice(content)?;
        let mut result = Map::new();
        result.insert("parsed".to_string(), parsed);
        Ok(result)
    }
}

/// Pulls the common headers and a body preview out of raw RFC 822-style
/// email text.
pub struct EmailProcessor;

#[async_trait]
impl Processor for EmailProcessor {
    async fn process(&self, content: &[u8]) -> anyhow::Result<Map<String, Value>> {
        let text = String::from_utf8_lossy(content);
        let (head, body) = match text.split_once("\n\n") {
            Some((head, body)) => (head, body),
            None => (text.as_ref(), ""),
        };

        let mut headers = Map::new();
        for line in head.lines() {
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim().to_ascii_lowercase();
                if matches!(name.as_str(), "from" | "to" | "subject" | "date") {
                    headers.insert(name, Value::String(value.trim().to_string()));
                }
            }
        }

        let mut result = Map::new();
        result.insert("headers".to_string(), Value::Object(headers));
        result.insert("body_preview".to_string(), Value::String(preview(body)));
        result.insert("body_length".to_string(), Value::from(body.trim().len()));
        Ok(result)
    }
}

const BODY_PREVIEW_CHARS: usize = 200;

fn preview(body: &str) -> String {
    body.trim().chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Extracts text from a PDF.
pub struct PdfProcessor;

#[async_trait]
impl Processor for PdfProcessor {
    async fn process(&self, content: &[u8]) -> anyhow::Result<Map<String, Value>> {
        let text = pdf_extract::extract_text_from_mem(content)
            .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {}", e))?;
        let mut result = Map::new();
        result.insert("length".to_string(), Value::from(text.len()));
        result.insert("text".to_string(), Value::String(text));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_classifier_trusts_known_hints() {
        let c = ExtensionClassifier;
        let classification = c.classify(b"whatever", "json").await.unwrap();
        assert_eq!(classification.format, DocumentFormat::Json);
        assert_eq!(classification.details.get("hint"), Some(&json!("json")));

        let classification = c.classify(b"whatever", "eml").await.unwrap();
        assert_eq!(classification.format, DocumentFormat::Email);
    }

    #[tokio::test]
    async fn test_classifier_sniffs_when_hint_is_unhelpful() {
        let c = ExtensionClassifier;
        let classification = c.classify(b"%PDF-1.7 ...", "").await.unwrap();
        assert_eq!(classification.format, DocumentFormat::Pdf);

        let classification = c.classify(br#"  {"a": 1}"#, "txt").await.unwrap();
        assert_eq!(classification.format, DocumentFormat::Json);

        let classification = c.classify(b"<feed/>", "xml").await.unwrap();
        assert_eq!(classification.format, DocumentFormat::Other("xml".to_string()));
    }

    #[tokio::test]
    async fn test_json_processor_parses_content() {
        let result = JsonProcessor.process(br#"{"a": 1}"#).await.unwrap();
        assert_eq!(result.get("parsed"), Some(&json!({"a": 1})));

        assert!(JsonProcessor.process(b"not json").await.is_err());
    }

    #[tokio::test]
    async fn test_email_processor_extracts_headers_and_preview() {
        let raw = b"From: a@example.com\nTo: b@example.com\nSubject: Hello\nX-Junk: drop\n\nBody text here.";
        let result = EmailProcessor.process(raw).await.unwrap();

        let headers = result.get("headers").unwrap();
        assert_eq!(headers.get("from"), Some(&json!("a@example.com")));
        assert_eq!(headers.get("subject"), Some(&json!("Hello")));
        assert!(headers.get("x-junk").is_none());

        assert_eq!(result.get("body_preview"), Some(&json!("Body text here.")));
        assert_eq!(result.get("body_length"), Some(&json!(15)));
    }
}
