// ImgBB client: a small blocking HTTP client that posts base64 image data
// as multipart form fields and extracts the hosted URL from the response.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::UploadError;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const RETRY_MAX_DOUBLINGS: u32 = 6;

/// Anything that can turn image bytes into a hosted URL.
pub trait Uploader {
    fn upload(&self, image: &[u8]) -> Result<String, UploadError>;
}

/// Success body: `{"data": {"url": "..."}, ...}`. Only the URL is used.
#[derive(Deserialize, Debug)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(Deserialize, Debug)]
struct UploadData {
    url: Option<String>,
}

/// Error body: `{"status_code": 400, "error": {"message": "..."}}`.
#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct ImgbbClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    retries: u32,
}

impl ImgbbClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, UploadError> {
        let client = Client::builder().build()?;
        Ok(ImgbbClient {
            client,
            endpoint: endpoint.into(),
            api_key,
            retries: 0,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(ImgbbClient {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            retries: config.retries,
        })
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Read a file and upload its contents.
    pub fn upload_file(&self, path: &Path) -> Result<String, UploadError> {
        let bytes = std::fs::read(path).map_err(|source| UploadError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.upload(&bytes)
    }

    fn upload_once(&self, api_key: &str, encoded: &str) -> Result<String, UploadError> {
        let form = multipart::Form::new()
            .text("key", api_key.to_string())
            .text("image", encoded.to_string());

        let res = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = res.status();
        let body = res.text()?;
        debug!(%status, bytes = body.len(), "upload response received");
        interpret_response(status, &body)
    }
}

impl Uploader for ImgbbClient {
    fn upload(&self, image: &[u8]) -> Result<String, UploadError> {
        let api_key = self.api_key.as_deref().ok_or(UploadError::MissingApiKey)?;
        let encoded = STANDARD.encode(image);

        let mut attempt = 0;
        loop {
            match self.upload_once(api_key, &encoded) {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    let delay = backoff_delay(attempt);
                    attempt += 1;
                    warn!(error = %e, attempt, ?delay, "upload failed, retrying");
                    thread::sleep(delay);
                }
                result => return result,
            }
        }
    }
}

/// Delay before retry number `attempt + 1`: 500ms doubling, capped at 32s.
pub fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(attempt.min(RETRY_MAX_DOUBLINGS))
}

/// Map a status code and body to the hosted URL or a typed error.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<String, UploadError> {
    if status != StatusCode::OK {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message);
        return Err(UploadError::HttpStatus { status, message });
    }

    let parsed: UploadResponse = serde_json::from_str(body).map_err(|e| UploadError::ResponseFormat {
        detail: format!("body is not valid JSON ({e})"),
    })?;

    parsed
        .data
        .and_then(|d| d.url)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| UploadError::ResponseFormat {
            detail: "missing data.url".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_interpret_success() {
        let body = r#"{"data":{"id":"2ndCYJK","url":"https://i.ibb.co/w04Prt6/c1f64245afb2.gif"},"success":true,"status":200}"#;
        let url = interpret_response(StatusCode::OK, body).unwrap();
        assert_eq!(url, "https://i.ibb.co/w04Prt6/c1f64245afb2.gif");
    }

    #[test]
    fn test_interpret_missing_url() {
        let body = r#"{"data":{"id":"2ndCYJK"},"success":true,"status":200}"#;
        let err = interpret_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, UploadError::ResponseFormat { .. }));
    }

    #[test]
    fn test_interpret_blank_url() {
        let body = r#"{"data":{"url":""}}"#;
        let err = interpret_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, UploadError::ResponseFormat { .. }));
    }

    #[test]
    fn test_interpret_non_json_success_body() {
        let err = interpret_response(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, UploadError::ResponseFormat { .. }));
    }

    #[test]
    fn test_interpret_error_status_with_message() {
        let body = r#"{"status_code":400,"error":{"message":"Invalid API v1 key.","code":100},"status_txt":"Bad Request"}"#;
        match interpret_response(StatusCode::BAD_REQUEST, body).unwrap_err() {
            UploadError::HttpStatus { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("Invalid API v1 key."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_non_200_success_class_is_still_error() {
        let body = r#"{"data":{"url":"https://i.ibb.co/x.png"}}"#;
        let err = interpret_response(StatusCode::CREATED, body).unwrap_err();
        assert!(matches!(err, UploadError::HttpStatus { status, .. } if status == StatusCode::CREATED));
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(500));
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(6), Duration::from_secs(32));
        assert_eq!(backoff_delay(40), Duration::from_secs(32));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(32));
    }

    #[test]
    fn test_upload_without_key_fails_before_network() {
        // Port 9 is never contacted because the key check comes first.
        let client = ImgbbClient::new("http://127.0.0.1:9/upload", None).unwrap();
        let err = client.upload(b"png").unwrap_err();
        assert!(matches!(err, UploadError::MissingApiKey));
    }

    #[test]
    fn test_upload_file_missing_path() {
        let client = ImgbbClient::new("http://127.0.0.1:9/upload", Some("k".into())).unwrap();
        let err = client.upload_file(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, UploadError::FileRead { .. }));
    }
}
