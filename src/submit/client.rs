//! HTTP submission client
//!
//! One request per submission, no retries. Transport failures, non-2xx
//! statuses and unreadable bodies surface as distinct errors.

use crate::config::{Config, SubmitMode};
use crate::error::{JobFormError, Result};
use crate::input::file_detector::FileType;
use crate::submit::payload::ApplicationPayload;
use log::{debug, info};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use std::path::PathBuf;
use std::time::Duration;

const ACCEPTED_TYPES: &str = "application/json, application/pdf";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Json(serde_json::Value),
    /// Generated document for download
    Document(Vec<u8>),
    Text(String),
}

pub struct SubmissionClient {
    http: Client,
    url: String,
    mode: SubmitMode,
}

impl SubmissionClient {
    pub fn new(url: impl Into<String>, timeout: Duration, mode: SubmitMode) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobFormError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
            mode,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.submission_url(),
            Duration::from_secs(config.api.timeout_secs),
            config.api.mode,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the payload. In multipart mode the raw `documents` are attached
    /// next to the JSON payload.
    pub async fn submit(
        &self,
        payload: &ApplicationPayload,
        documents: &[PathBuf],
    ) -> Result<SubmissionOutcome> {
        info!("Submitting application to {}", self.url);

        let request = self
            .http
            .post(&self.url)
            .header(ACCEPT, HeaderValue::from_static(ACCEPTED_TYPES));

        let request = match self.mode {
            SubmitMode::Json => request.json(payload),
            SubmitMode::Multipart => request.multipart(multipart_form(payload, documents).await?),
        };

        let response = request.send().await?;
        classify(response).await
    }
}

async fn multipart_form(payload: &ApplicationPayload, documents: &[PathBuf]) -> Result<Form> {
    let mut form = Form::new().text("data", serde_json::to_string(payload)?);

    for path in documents {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        let mime = match FileType::from_path(path) {
            FileType::Pdf => "application/pdf",
            FileType::Markdown => "text/markdown",
            FileType::Text | FileType::Unknown => "text/plain",
        };

        let part = Part::bytes(bytes).file_name(name).mime_str(mime)?;
        form = form.part("documents", part);
    }

    Ok(form)
}

async fn classify(response: Response) -> Result<SubmissionOutcome> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();
    debug!("Response {} ({})", status, content_type);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(JobFormError::HttpStatus {
            status: status.as_u16(),
            detail: error_detail(status, &content_type, &body),
        });
    }

    if content_type.contains("application/pdf") {
        let bytes = response.bytes().await?;
        return Ok(SubmissionOutcome::Document(bytes.to_vec()));
    }

    if content_type.contains("application/json") {
        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| JobFormError::MalformedResponse(e.to_string()))?;
        return Ok(SubmissionOutcome::Json(value));
    }

    Ok(SubmissionOutcome::Text(response.text().await?))
}

/// Best available description of a failed request: the JSON `message`,
/// the whole JSON body, the plain body, then the status reason
pub fn error_detail(status: StatusCode, content_type: &str, body: &str) -> String {
    let reason = || status.canonical_reason().unwrap_or("").to_string();

    if content_type.contains("application/json") {
        return match serde_json::from_str::<serde_json::Value>(body) {
            Ok(json) => match json.get("message").and_then(|m| m.as_str()) {
                Some(message) => message.to_string(),
                None => json.to_string(),
            },
            Err(_) => reason(),
        };
    }

    if body.trim().is_empty() {
        reason()
    } else {
        body.to_string()
    }
}
