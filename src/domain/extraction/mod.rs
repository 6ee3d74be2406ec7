//! Extraction module - Turning tool prose into document references.
//!
//! The backend reports hits in human-readable text such as
//! `1 (File: intro.md): ...`. This is a presentation convention, not a
//! protocol: if the backend changes its formatting, extraction returns fewer
//! or zero references instead of failing.

mod document_reference;
mod extractor;

pub use document_reference::{dedupe_preserving_order, DocumentReference};
pub use extractor::{ResultExtractor, FILE_REFERENCE_PATTERN};
