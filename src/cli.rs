// Command-line interface: image paths plus the flags that tune the
// picker, retries, clipboard, notifications and verbosity.

use clap::Parser;
use std::path::PathBuf;

use crate::platform::picker::PickerKind;

#[derive(Parser, Debug)]
#[command(name = "imgbb")]
#[command(
    about = "Upload images to ImgBB and copy the resulting URL to the clipboard",
    long_about = "Upload one or more images to ImgBB. Each uploaded URL is copied to the \
                  clipboard as it arrives, so the last successful upload is what remains. \
                  Without arguments a file selection dialog is opened."
)]
pub struct Cli {
    /// Image files to upload. Relative paths are resolved against the current directory.
    pub paths: Vec<PathBuf>,

    /// Directory the file selection dialog starts in
    #[arg(long, value_name = "DIR")]
    pub start_dir: Option<PathBuf>,

    /// Which file selection dialog to use when no paths are given
    #[arg(long, value_enum, default_value_t = PickerKind::Auto)]
    pub picker: PickerKind,

    /// Retry network failures and 5xx responses this many times
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not copy URLs to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Do not show desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Only print the uploaded URLs
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
