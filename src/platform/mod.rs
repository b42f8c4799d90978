// Platform-specific collaborators: file selection, clipboard and desktop
// notifications. Each concern is a trait with one implementation per
// target platform, chosen once at startup.

pub mod clipboard;
pub mod command;
pub mod notify;
pub mod picker;

use tracing::debug;

use self::clipboard::{ArboardClipboard, ClipboardWriter, CommandClipboard};
use self::notify::{CommandNotifier, Notifier, NullNotifier};
use self::picker::{NativePicker, Picker, PickerKind, ShellPicker, TerminalPicker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// Build the file picker for `kind`. `Auto` prefers the platform's own
/// dialog tool and falls back to the native toolkit dialog when it is missing.
pub fn picker_for(platform: Platform, kind: PickerKind) -> Box<dyn Picker> {
    match kind {
        PickerKind::Terminal => Box::new(TerminalPicker),
        PickerKind::Native => Box::new(NativePicker),
        PickerKind::Auto => {
            let shell = ShellPicker::new(platform);
            if shell.is_available() {
                Box::new(shell)
            } else {
                debug!(?platform, "platform dialog tool not found, using native dialog");
                Box::new(NativePicker)
            }
        }
    }
}

/// `None` when copying is turned off with `--no-clipboard`.
pub fn clipboard_for(platform: Platform, enabled: bool) -> Option<Box<dyn ClipboardWriter>> {
    if !enabled {
        return None;
    }
    let commands = CommandClipboard::new(platform);
    let writer: Box<dyn ClipboardWriter> = if commands.is_available() {
        Box::new(commands)
    } else {
        debug!(?platform, "no clipboard command found, using arboard");
        Box::new(ArboardClipboard)
    };
    Some(writer)
}

pub fn notifier_for(platform: Platform, enabled: bool) -> Box<dyn Notifier> {
    if enabled {
        Box::new(CommandNotifier::new(platform))
    } else {
        Box::new(NullNotifier)
    }
}
