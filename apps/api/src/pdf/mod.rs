//! Minimal PDF rendering for generated candidate documents.
//!
//! Documents are a flat list of [`Block`]s laid out top to bottom on A4 pages
//! using the built-in Helvetica faces, so no font files ship with the service.

pub mod document;
pub mod metrics;

pub use document::{Align, Block, DocumentBuilder, PdfError, Rgb};
pub use metrics::Face;
