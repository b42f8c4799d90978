// Terminal output for a run: the list of selected files, a spinner while
// each upload is in flight, and a summary. Diagnostics go through tracing
// on stderr; everything here is meant for the user on stdout.

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::batch::BatchOutcome;

pub struct Console {
    quiet: bool,
}

impl Console {
    /// With `quiet` set only the uploaded URLs are printed, one per line.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn selected_files(&self, paths: &[PathBuf]) {
        if self.quiet {
            return;
        }
        println!("Selected files ({}):", paths.len());
        for (i, p) in paths.iter().enumerate() {
            println!("  {}. {}", i + 1, p.display());
        }
        println!();
    }

    /// Show a spinner for the file being uploaded. Hidden in quiet mode and
    /// when stdout is not a terminal.
    pub fn start_file(&self, index: usize, total: usize, file_name: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        println!("[{index}/{total}] {file_name}");
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("  {spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Uploading...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn file_uploaded(&self, spinner: &ProgressBar, url: &str, copied: bool) {
        spinner.finish_and_clear();
        if self.quiet {
            println!("{url}");
            return;
        }
        println!("  {} {}", "✓".green(), url);
        if copied {
            println!("  {} copied to clipboard", "✓".green());
        }
        println!();
    }

    pub fn file_failed(&self, spinner: &ProgressBar, message: &str) {
        spinner.finish_and_clear();
        if self.quiet {
            return;
        }
        println!("  {} {}", "✗".red(), message);
        println!();
    }

    pub fn summary(&self, outcome: &BatchOutcome) {
        if self.quiet {
            return;
        }
        for line in summary_lines(outcome) {
            println!("{line}");
        }
    }
}

/// Lines of the end-of-run summary. The clipboard is only mentioned when
/// a URL was actually copied.
pub fn summary_lines(outcome: &BatchOutcome) -> Vec<String> {
    let urls = outcome.urls();
    let mut lines = vec![format!("{}", "Upload complete".bold())];
    for (i, url) in urls.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, url));
    }
    lines.push(String::new());
    lines.push(format!("{} {} of {} image(s) uploaded", "✓".green(), urls.len(), outcome.total()));

    if outcome.failed() > 0 {
        lines.push(format!("{} {} failed:", "✗".red(), outcome.failed()));
        for (name, message) in outcome.failures() {
            lines.push(format!("  - {name}: {message}"));
        }
    }

    if outcome.last_url_copied() {
        lines.push(format!("{} the last URL is on the clipboard", "✓".green()));
    } else if let Some(url) = outcome.clipboard_url() {
        lines.push(format!("{} the clipboard holds {url}", "!".yellow()));
    }
    lines
}
