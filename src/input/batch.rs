//! Concurrent extraction of every uploaded document
//!
//! The whole list is validated before any work starts; a problem there
//! aborts the batch. After that each file is extracted independently and a
//! failure only affects that file's entry.

use crate::error::{JobFormError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor, DEFAULT_PAGE_MARKER,
};
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name to extracted text, or to an error marker for failed files
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedDocuments {
    pub contents: BTreeMap<String, String>,
    #[serde(skip)]
    pub failed: Vec<String>,
}

impl ExtractedDocuments {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.contents.len() - self.failed.len()
    }
}

/// Text stored in place of a document that could not be read
pub fn error_marker(reason: &str) -> String {
    format!("[extraction failed: {}]", reason)
}

#[derive(Debug, Clone)]
struct Upload {
    name: String,
    path: PathBuf,
    file_type: FileType,
}

pub struct DocumentBatch {
    page_marker: Arc<str>,
}

impl Default for DocumentBatch {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_MARKER)
    }
}

impl DocumentBatch {
    pub fn new(page_marker: &str) -> Self {
        Self {
            page_marker: Arc::from(page_marker),
        }
    }

    pub async fn extract_all(&self, paths: &[PathBuf]) -> Result<ExtractedDocuments> {
        let uploads = validate(paths)?;
        info!("Extracting text from {} documents", uploads.len());

        let handles: Vec<_> = uploads
            .into_iter()
            .map(|upload| {
                let marker = Arc::clone(&self.page_marker);
                let name = upload.name.clone();
                let handle = tokio::spawn(async move { extract_one(&upload, &marker).await });
                (name, handle)
            })
            .collect();

        let mut documents = ExtractedDocuments::default();
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(JobFormError::PdfExtraction(format!("extraction task failed: {}", e))),
            };

            let text = match outcome {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not extract '{}': {}", name, e);
                    documents.failed.push(name.clone());
                    error_marker(&e.to_string())
                }
            };
            documents.contents.insert(name, text);
        }

        Ok(documents)
    }
}

async fn extract_one(upload: &Upload, page_marker: &str) -> Result<String> {
    match upload.file_type {
        FileType::Pdf => PdfExtractor::new(page_marker).extract(&upload.path).await,
        FileType::Text => PlainTextExtractor.extract(&upload.path).await,
        FileType::Markdown => MarkdownExtractor.extract(&upload.path).await,
        FileType::Unknown => Err(JobFormError::UnsupportedFormat(upload.name.clone())),
    }
}

fn validate(paths: &[PathBuf]) -> Result<Vec<Upload>> {
    let mut names = HashSet::new();
    let mut uploads = Vec::with_capacity(paths.len());

    for path in paths {
        let name = file_name(path)?;

        if !path.is_file() {
            return Err(JobFormError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown {
            return Err(JobFormError::UnsupportedFormat(format!(
                "{} (supported: pdf, txt, md)",
                path.display()
            )));
        }

        if !names.insert(name.clone()) {
            return Err(JobFormError::InvalidInput(format!(
                "Two documents share the file name '{}'",
                name
            )));
        }

        uploads.push(Upload {
            name,
            path: path.clone(),
            file_type,
        });
    }

    Ok(uploads)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| JobFormError::InvalidInput(format!("Not a file path: {}", path.display())))
}
