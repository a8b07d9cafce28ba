//! Application submission to the backend

pub mod client;
pub mod payload;

pub use client::{SubmissionClient, SubmissionOutcome};
pub use payload::ApplicationPayload;

use crate::draft::FormSnapshot;
use crate::error::{JobFormError, Result};
use crate::input::DocumentBatch;
use chrono::Local;
use log::info;
use std::path::{Path, PathBuf};

/// Write a document returned by the backend into `dir`
pub async fn save_document(bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = format!("application_{}.pdf", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;

    info!("Saved returned document to {}", path.display());
    Ok(path)
}

/// Validate the form, extract every document concurrently and send the
/// aggregate. Per-file extraction failures travel inside the payload;
/// anything else ends the attempt.
pub async fn submit_application(
    form: &FormSnapshot,
    documents: &[PathBuf],
    batch: &DocumentBatch,
    client: &SubmissionClient,
) -> Result<SubmissionOutcome> {
    let missing = form.missing_required();
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|f| f.name()).collect();
        return Err(JobFormError::Validation(format!(
            "Required fields are empty: {}",
            names.join(", ")
        )));
    }

    let extracted = batch.extract_all(documents).await?;
    let payload = ApplicationPayload::new(form.clone(), extracted);
    client.submit(&payload, documents).await
}
