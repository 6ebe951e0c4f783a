//! # Dispatcher
//!
//! Takes one raw input (file bytes, raw JSON text, or raw email text),
//! classifies it through the [`Classifier`] port, routes it to the matching
//! [`Processor`], and records the outcome in shared memory. Formats without
//! a routed processor degrade to a placeholder result instead of failing the
//! call. Each call runs classify → route → process → persist independently;
//! a failure at any step ends that call with a discriminated error and no
//! partial entry.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, instrument};

use docpipe_core::{
    Classifier, DispatchOutcome, DispatchRequest, DocumentFormat, Processor,
};
use shared_memory::{MemoryError, SharedMemory};

/// Dispatch failures, discriminated so callers can map them to transport
/// semantics (bad request vs upstream failure) without matching error text.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No input variant was populated; nothing was classified or stored.
    #[error("no input provided: supply a file, JSON data, or email content")]
    InvalidInput,

    /// The classifier collaborator failed.
    #[error("classification failed: {0}")]
    Classification(#[source] anyhow::Error),

    /// The routed processor collaborator failed.
    #[error("processing failed: {0}")]
    Processing(#[source] anyhow::Error),

    /// Persisting the context entry failed.
    #[error("shared memory error: {0}")]
    Memory(#[from] MemoryError),
}

/// Routes classified inputs to format processors and persists outcomes.
///
/// Holds the collaborator ports and the shared store; build one at startup
/// and share it across calls.
pub struct Dispatcher {
    classifier: Arc<dyn Classifier>,
    json_processor: Arc<dyn Processor>,
    email_processor: Arc<dyn Processor>,
    pdf_processor: Arc<dyn Processor>,
    memory: Arc<SharedMemory>,
}

impl Dispatcher {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        json_processor: Arc<dyn Processor>,
        email_processor: Arc<dyn Processor>,
        pdf_processor: Arc<dyn Processor>,
        memory: Arc<SharedMemory>,
    ) -> Self {
        Self {
            classifier,
            json_processor,
            email_processor,
            pdf_processor,
            memory,
        }
    }

    /// Classifies the request's input, routes it, persists a context entry,
    /// and returns `{classification, result, entry_id}`.
    ///
    /// Fails with [`DispatchError::InvalidInput`] before touching any
    /// collaborator when no input variant is populated. Collaborator
    /// failures are logged and surfaced once with the cause preserved,
    /// never retried, and leave no partial entry behind.
    #[instrument(skip(self, request))]
    pub async fn handle(
        &self,
        request: DispatchRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let (content, hint, source) = select_input(&request)?;

        info!(
            hint = %hint,
            source = source,
            len = content.len(),
            "step: classifying input"
        );
        let classification = self.classifier.classify(content, &hint).await.map_err(|e| {
            error!(error = %e, "classification failed");
            DispatchError::Classification(e)
        })?;

        info!(format = %classification.format, "step: routing classified input");
        let result = match self.route(&classification.format) {
            Some(processor) => {
                info!(format = %classification.format, "step: processing");
                processor.process(content).await.map_err(|e| {
                    error!(
                        error = %e,
                        format = %classification.format,
                        "processing failed"
                    );
                    DispatchError::Processing(e)
                })?
            }
            None => {
                info!(
                    format = %classification.format,
                    "no processor routed, returning placeholder"
                );
                placeholder_result(&classification.format)
            }
        };

        info!("step: persisting context entry");
        let mut payload = Map::new();
        payload.insert("source".to_string(), Value::String(source.to_string()));
        if let Some(file) = &request.file {
            payload.insert("file_name".to_string(), Value::String(file.name.clone()));
        }
        payload.insert(
            "classification".to_string(),
            serde_json::to_value(&classification).map_err(MemoryError::from)?,
        );
        payload.insert("result".to_string(), Value::Object(result.clone()));

        let entry_id = self.memory.store(payload, request.thread_id.clone()).await?;
        info!(%entry_id, "step: dispatch done");

        Ok(DispatchOutcome {
            classification,
            result,
            entry_id,
        })
    }

    /// The fixed routing table. Unrouted formats return `None` and degrade
    /// to a placeholder result.
    fn route(&self, format: &DocumentFormat) -> Option<&Arc<dyn Processor>> {
        match format {
            DocumentFormat::Json => Some(&self.json_processor),
            DocumentFormat::Email => Some(&self.email_processor),
            DocumentFormat::Pdf => Some(&self.pdf_processor),
            DocumentFormat::Unknown | DocumentFormat::Other(_) => None,
        }
    }
}

/// Picks the populated input variant (file, then JSON text, then email text)
/// and derives the classification hint and the source tag recorded in the
/// entry. Fails before any collaborator runs when nothing is populated.
fn select_input(
    request: &DispatchRequest,
) -> Result<(&[u8], String, &'static str), DispatchError> {
    if let Some(file) = &request.file {
        Ok((file.content.as_slice(), extension_hint(&file.name), "file"))
    } else if let Some(text) = &request.json_text {
        Ok((text.as_bytes(), "json".to_string(), "json"))
    } else if let Some(text) = &request.email_text {
        Ok((text.as_bytes(), "email".to_string(), "email"))
    } else {
        Err(DispatchError::InvalidInput)
    }
}

/// Lowercased file-name extension without the dot; empty when absent.
fn extension_hint(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Result recorded for formats with no routed processor.
fn placeholder_result(format: &DocumentFormat) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert(
        "message".to_string(),
        Value::String(format!(
            "Processing {} documents is not implemented yet.",
            format
        )),
    );
    result
}


// Integration tests live in tests/dispatch_test.rs
