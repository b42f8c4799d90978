// Sequential upload of a list of files. Each file is read, uploaded and
// reported before the next one starts; a failing file is recorded and the
// run continues. Clipboard and notification failures are only logged.

use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

use crate::api::Uploader;
use crate::error::{AppError, UploadError};
use crate::platform::clipboard::ClipboardWriter;
use crate::platform::notify::{Notification, Notifier};
use crate::ui::Console;

pub const EXIT_SUCCESS: u8 = 0;

/// Result of one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub file_name: String,
    pub result: Result<String, UploadError>,
    /// Whether the URL actually reached the clipboard.
    pub copied: bool,
}

/// Per-file results in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().ok().map(String::as_str))
            .collect()
    }

    /// (file name, error message) for every failed file.
    pub fn failures(&self) -> Vec<(&str, String)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.file_name.as_str(), e.to_string())))
            .collect()
    }

    /// URL of the last successful upload.
    pub fn last_url(&self) -> Option<&str> {
        self.urls().last().copied()
    }

    /// The URL left on the clipboard: the last one that was copied.
    pub fn clipboard_url(&self) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .filter(|f| f.copied)
            .find_map(|f| f.result.as_ref().ok().map(String::as_str))
    }

    /// True when the last successful URL is the one on the clipboard.
    pub fn last_url_copied(&self) -> bool {
        self.files.iter().rev().find(|f| f.result.is_ok()).is_some_and(|f| f.copied)
    }
}

/// The external capabilities a batch drives. `clipboard` is `None` when
/// copying is turned off.
pub struct Collaborators<'a> {
    pub uploader: &'a dyn Uploader,
    pub clipboard: Option<&'a dyn ClipboardWriter>,
    pub notifier: &'a dyn Notifier,
}

/// Upload `paths` one at a time. Fails with `NoSuccess` when not a single
/// file could be uploaded, and with `Config` as soon as the uploader
/// reports a missing API key.
pub fn run(paths: &[PathBuf], collab: &Collaborators, console: &Console) -> Result<BatchOutcome, AppError> {
    console.selected_files(paths);
    let total = paths.len();

    let outcome = paths
        .iter()
        .enumerate()
        .try_fold(BatchOutcome::default(), |mut outcome, (i, path)| {
            outcome.files.push(upload_one(path, i + 1, total, collab, console)?);
            Ok::<_, AppError>(outcome)
        })?;

    let succeeded = outcome.succeeded();
    info!(succeeded, total, "batch finished");
    if succeeded == 0 {
        return Err(AppError::NoSuccess { total });
    }

    console.summary(&outcome);
    notify(
        collab.notifier,
        &Notification::upload_complete(succeeded, total, outcome.last_url_copied()),
    );
    Ok(outcome)
}

fn upload_one(
    path: &Path,
    index: usize,
    total: usize,
    collab: &Collaborators,
    console: &Console,
) -> Result<FileOutcome, AppError> {
    let file_name = display_name(path);
    let _span = info_span!("upload", file = %file_name, index, total).entered();
    let spinner = console.start_file(index, total, &file_name);

    let result = std::fs::read(path)
        .map_err(|source| UploadError::FileRead {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|bytes| collab.uploader.upload(&bytes));

    let mut copied = false;
    match &result {
        Ok(url) => {
            info!(%url, "uploaded");
            copied = collab.clipboard.is_some_and(|clipboard| copy_url(clipboard, url));
            console.file_uploaded(&spinner, url, copied);
            notify(collab.notifier, &Notification::upload_success(&file_name, url));
        }
        Err(UploadError::MissingApiKey) => {
            spinner.finish_and_clear();
            return Err(AppError::Config(UploadError::MissingApiKey.to_string()));
        }
        Err(e) => {
            let message = e.to_string();
            warn!(error = %message, "upload failed");
            console.file_failed(&spinner, &message);
            notify(collab.notifier, &Notification::upload_failed(&file_name, &message));
        }
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        file_name,
        result,
        copied,
    })
}

fn copy_url(clipboard: &dyn ClipboardWriter, url: &str) -> bool {
    match clipboard.copy(url) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "failed to copy URL to clipboard");
            false
        }
    }
}

fn notify(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(e) = notifier.notify(notification) {
        warn!(error = %format!("{e:#}"), title = %notification.title, "failed to show notification");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Process exit code for a finished run.
pub fn exit_code(result: &Result<BatchOutcome, AppError>) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => e.exit_code(),
    }
}
