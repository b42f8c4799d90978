// Library root
// ------------
// The `imgbb` binary is a thin wrapper around these modules.
//
// Module responsibilities:
// - `api`: the ImgBB HTTP client and the `Uploader` trait.
// - `paths`: turns arguments (or an interactive selection) into absolute paths.
// - `batch`: uploads the files one by one and collects the outcome.
// - `platform`: file dialogs, clipboard and notifications per OS.
// - `ui`: what the user sees in the terminal.
// - `cli`, `config`, `error`: command line, settings and error types.
pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod paths;
pub mod platform;
pub mod ui;

pub use api::{ImgbbClient, Uploader};
pub use batch::{BatchOutcome, Collaborators};
pub use error::{AppError, UploadError};
