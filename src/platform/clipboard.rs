// Clipboard writers. Each successful upload's URL is handed to one of these;
// failures are reported to the caller, which only logs them.

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;

use super::command::{command_exists, pipe_to};
use super::Platform;

const NO_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];
const XSEL_ARGS: &[&str] = &["--clipboard", "--input"];

pub trait ClipboardWriter {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Pipes the text into the platform's clipboard command. The clipboard
/// keeps its contents after this process exits, which arboard cannot
/// guarantee on Linux.
pub struct CommandClipboard {
    candidates: Vec<(&'static str, &'static [&'static str])>,
}

impl CommandClipboard {
    pub fn new(platform: Platform) -> Self {
        let candidates = match platform {
            Platform::MacOs => vec![("pbcopy", NO_ARGS)],
            Platform::Windows => vec![("clip", NO_ARGS)],
            Platform::Linux => vec![("wl-copy", NO_ARGS), ("xclip", XCLIP_ARGS), ("xsel", XSEL_ARGS)],
        };
        Self { candidates }
    }

    pub fn is_available(&self) -> bool {
        self.candidates.iter().any(|(cmd, _)| command_exists(cmd))
    }
}

impl ClipboardWriter for CommandClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut last_err = None;
        for (cmd, args) in &self.candidates {
            if !command_exists(cmd) {
                continue;
            }
            match pipe_to(cmd, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(command = *cmd, error = %e, "clipboard command failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("No clipboard command available")))
    }
}

/// In-process clipboard access through arboard.
pub struct ArboardClipboard;

impl ClipboardWriter for ArboardClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to copy text to clipboard")?;
        Ok(())
    }
}
