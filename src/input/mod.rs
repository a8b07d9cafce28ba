//! Document input
//! File detection, per-format text extraction and concurrent batch extraction

pub mod batch;
pub mod file_detector;
pub mod text_extractor;

pub use batch::{DocumentBatch, ExtractedDocuments};
