//! Text extraction from various file formats

use crate::error::{JobFormError, Result};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub const DEFAULT_PAGE_MARKER: &str = "--- Page End ---";

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor {
    page_marker: String,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_MARKER)
    }
}

impl PdfExtractor {
    pub fn new(page_marker: impl Into<String>) -> Self {
        Self {
            page_marker: page_marker.into(),
        }
    }
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let name = path.display().to_string();

        // Parsing is CPU-bound; keep it off the async workers
        let pages = tokio::task::spawn_blocking(move || extract_pages_from_mem(&bytes))
            .await
            .map_err(|e| JobFormError::PdfExtraction(format!("Extraction task for '{}' failed: {}", name, e)))??;

        Ok(join_pages(&pages, &self.page_marker))
    }
}

/// Text of every page of an in-memory PDF, in page order
pub fn extract_pages_from_mem(bytes: &[u8]) -> Result<Vec<String>> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| JobFormError::PdfExtraction(e.to_string()))
}

/// Concatenate page texts, closing each page with the marker line
pub fn join_pages<S: AsRef<str>>(pages: &[S], marker: &str) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
        text.push_str(marker);
        text.push('\n');
    }
    text
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"))
}

/// Render Markdown and strip the markup, one non-empty line per block
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let clean_text = tag_regex().replace_all(&text, "").replace("&amp;", "&");

    clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
