// Error taxonomy. `UploadError` covers everything that can go wrong for a
// single file and is recorded in the batch outcome; `AppError` is fatal and
// ends the run with a non-zero exit code.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("IMGBB_API_KEY is not set")]
    MissingApiKey,

    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload rejected by server (status={status}){}", detail_suffix(.message))]
    HttpStatus {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("unexpected response format: {detail}")]
    ResponseFormat { detail: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

fn detail_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl UploadError {
    /// Transient failures that a retry may fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            UploadError::Network(_) => true,
            UploadError::HttpStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no files were selected")]
    NoSelection,

    #[error("file selection dialog failed: {0:#}")]
    Picker(anyhow::Error),

    #[error("no images were uploaded ({total} file(s) attempted)")]
    NoSuccess { total: usize },
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}
