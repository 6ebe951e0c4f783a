//! Core types and collaborator ports for the docpipe document pipeline.
//!
//! The pipeline itself lives in the `dispatch` and `shared-memory` crates;
//! this crate holds what both sides of the boundary share: the format and
//! classification types, the request/outcome shapes, the [`Classifier`] and
//! [`Processor`] port traits, and tracing setup for binaries.

pub mod logger;
pub mod ports;
pub mod types;

pub use ports::{Classifier, Processor};
pub use types::{Classification, DispatchOutcome, DispatchRequest, DocumentFormat, FileInput};
