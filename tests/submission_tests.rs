//! Submission tests against a local one-shot HTTP server

use jobform::config::SubmitMode;
use jobform::draft::FormSnapshot;
use jobform::error::JobFormError;
use jobform::input::DocumentBatch;
use jobform::submit::{self, SubmissionClient, SubmissionOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer a single request with the given status line, content type and
/// body. The handle yields the raw request that was received.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/create_job", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            content_type,
            body.len()
        );
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.write_all(&body).await.unwrap();
        stream.shutdown().await.unwrap();

        request
    });

    (url, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn request_body(request: &str) -> &str {
    request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or("")
}

fn complete_form() -> FormSnapshot {
    FormSnapshot {
        job_title: "Werkstudent Backend".to_string(),
        location: "leipzig".to_string(),
        radius: 20,
        job_sites: "StepStone".to_string(),
        skills: vec!["python".to_string(), "docker".to_string()],
        ..Default::default()
    }
}

fn client(url: &str, mode: SubmitMode) -> SubmissionClient {
    SubmissionClient::new(url, Duration::from_secs(5), mode).unwrap()
}

fn cover_letter() -> Vec<PathBuf> {
    vec![PathBuf::from("tests/fixtures/cover_letter.txt")]
}

#[tokio::test]
async fn test_json_submission() {
    let (url, server) = serve_once("200 OK", "application/json", br#"{"id":42}"#.to_vec()).await;

    let outcome = submit::submit_application(
        &complete_form(),
        &cover_letter(),
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Json),
    )
    .await
    .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Json(serde_json::json!({ "id": 42 })));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/create_job"));

    let payload: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
    assert_eq!(payload["jobTitle"], "Werkstudent Backend");
    assert_eq!(payload["radius"], 20);
    assert_eq!(payload["skills"], serde_json::json!(["python", "docker"]));
    assert!(payload["pdfContents"]["cover_letter.txt"]
        .as_str()
        .unwrap()
        .contains("Leipzig"));
}

#[tokio::test]
async fn test_multipart_submission_attaches_documents() {
    let (url, server) = serve_once("200 OK", "text/plain", b"received".to_vec()).await;

    let outcome = submit::submit_application(
        &complete_form(),
        &cover_letter(),
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Multipart),
    )
    .await
    .unwrap();
    assert_eq!(outcome, SubmissionOutcome::Text("received".to_string()));

    let request = server.await.unwrap();
    assert!(request.contains("multipart/form-data"));
    assert!(request.contains(r#"name="data""#));
    assert!(request.contains(r#"name="documents"; filename="cover_letter.txt""#));
}

#[tokio::test]
async fn test_document_response_is_saved() {
    let pdf = b"%PDF-1.4 generated application".to_vec();
    let (url, server) = serve_once("200 OK", "application/pdf", pdf.clone()).await;

    let outcome = submit::submit_application(
        &complete_form(),
        &[],
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Json),
    )
    .await
    .unwrap();
    server.await.unwrap();

    let SubmissionOutcome::Document(bytes) = outcome else {
        panic!("expected a document, got {:?}", outcome);
    };
    assert_eq!(bytes, pdf);

    let temp_dir = TempDir::new().unwrap();
    let path = submit::save_document(&bytes, temp_dir.path()).await.unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("application_") && name.ends_with(".pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), pdf);
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let body = br#"{"message":"Location is not supported"}"#.to_vec();
    let (url, server) = serve_once("400 Bad Request", "application/json", body).await;

    let result = submit::submit_application(
        &complete_form(),
        &[],
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Json),
    )
    .await;
    server.await.unwrap();

    match result {
        Err(JobFormError::HttpStatus { status, detail }) => {
            assert_eq!(status, 400);
            assert_eq!(detail, "Location is not supported");
        }
        other => panic!("expected an HTTP status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_json_response() {
    let (url, server) = serve_once("200 OK", "application/json", b"{not json".to_vec()).await;

    let result = submit::submit_application(
        &complete_form(),
        &[],
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Json),
    )
    .await;
    server.await.unwrap();

    assert!(matches!(result, Err(JobFormError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/create_job", listener.local_addr().unwrap());
    drop(listener);

    let result = submit::submit_application(
        &complete_form(),
        &[],
        &DocumentBatch::default(),
        &client(&url, SubmitMode::Json),
    )
    .await;

    assert!(matches!(result, Err(JobFormError::Network(_))));
}

#[tokio::test]
async fn test_incomplete_form_is_not_sent() {
    let form = FormSnapshot {
        job_title: "Werkstudent".to_string(),
        ..Default::default()
    };

    let result = submit::submit_application(
        &form,
        &[],
        &DocumentBatch::default(),
        &client("http://127.0.0.1:9/api/create_job", SubmitMode::Json),
    )
    .await;

    match result {
        Err(JobFormError::Validation(message)) => {
            assert!(message.contains("location"));
            assert!(message.contains("jobSites"));
            assert!(!message.contains("jobTitle"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}
