//! Aggregate sent to the backend

use crate::draft::FormSnapshot;
use crate::input::ExtractedDocuments;
use serde::Serialize;
use std::collections::BTreeMap;

/// Form fields at the top level plus `pdfContents`, mapping each uploaded
/// file name to its extracted text or error marker
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[serde(flatten)]
    pub form: FormSnapshot,
    pub pdf_contents: BTreeMap<String, String>,
}

impl ApplicationPayload {
    pub fn new(form: FormSnapshot, documents: ExtractedDocuments) -> Self {
        Self {
            form,
            pdf_contents: documents.contents,
        }
    }
}
