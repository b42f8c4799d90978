// File selection: the `Picker` trait and its variants (platform dialog
// tools, the rfd toolkit dialog, a terminal multi-select).

use anyhow::{Context, Result};
use dialoguer::MultiSelect;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::command::{capture, command_exists};
use super::Platform;

/// Extensions offered by the platform dialogs.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// The toolkit and terminal pickers also accept webp, which ImgBB hosts too.
pub const EXTENDED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

const DIALOG_TITLE: &str = "Select images to upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PickerKind {
    /// Platform dialog tool (zenity, AppleScript, PowerShell), else native dialog
    Auto,
    /// Native toolkit dialog
    Native,
    /// Multi-select list in the terminal
    Terminal,
}

/// Interactive selection of image files. A cancelled dialog is an empty
/// selection, not an error.
pub trait Picker {
    fn pick(&self, start_dir: &Path) -> Result<Vec<PathBuf>>;
}

pub struct ShellPicker {
    platform: Platform,
}

impl ShellPicker {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn tool(&self) -> &'static str {
        match self.platform {
            Platform::MacOs => "osascript",
            Platform::Windows => "powershell",
            Platform::Linux => "zenity",
        }
    }

    pub fn is_available(&self) -> bool {
        command_exists(self.tool())
    }

    fn pick_linux(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        let patterns = IMAGE_EXTENSIONS
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect::<Vec<_>>()
            .join(" ");
        // Trailing separator makes zenity open the directory rather than preselect it.
        let filename = format!("--filename={}/", start_dir.display());
        let filter = format!("--file-filter=Image files | {patterns}");
        let title = format!("--title={DIALOG_TITLE}");

        let out = capture(
            "zenity",
            &["--file-selection", "--multiple", "--separator=|", &title, &filename, &filter],
        )?;
        if !out.success {
            return Ok(Vec::new());
        }
        Ok(split_selection(&out.stdout, '|'))
    }

    fn pick_macos(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        let out = with_script_file(&apple_script(start_dir), ".scpt", |path| {
            capture("osascript", &[&path.to_string_lossy()])
        })?;
        if !out.success {
            return Ok(Vec::new());
        }
        Ok(split_selection(&out.stdout, '\n'))
    }

    fn pick_windows(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        let patterns = IMAGE_EXTENSIONS
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect::<Vec<_>>()
            .join(";");
        let script = format!(
            "Add-Type -AssemblyName System.Windows.Forms; \
             $dialog = New-Object System.Windows.Forms.OpenFileDialog; \
             $dialog.Title = '{title}'; \
             $dialog.InitialDirectory = '{dir}'; \
             $dialog.Filter = 'Image Files ({patterns})|{patterns}|All Files (*.*)|*.*'; \
             $dialog.Multiselect = $true; \
             if ($dialog.ShowDialog() -eq 'OK') {{ $dialog.FileNames -join '|' }} else {{ '' }}",
            title = DIALOG_TITLE,
            dir = powershell_quote(&start_dir.to_string_lossy()),
        );

        let out = capture("powershell", &["-NoProfile", "-STA", "-Command", &script])?;
        if !out.success {
            return Ok(Vec::new());
        }
        Ok(split_selection(&out.stdout, '|'))
    }
}

impl Picker for ShellPicker {
    fn pick(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        match self.platform {
            Platform::Linux => self.pick_linux(start_dir),
            Platform::MacOs => self.pick_macos(start_dir),
            Platform::Windows => self.pick_windows(start_dir),
        }
    }
}

/// Toolkit dialog through rfd.
pub struct NativePicker;

impl Picker for NativePicker {
    fn pick(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        let files = rfd::FileDialog::new()
            .set_title(DIALOG_TITLE)
            .set_directory(start_dir)
            .add_filter("Image Files", EXTENDED_IMAGE_EXTENSIONS)
            .pick_files();
        Ok(files.unwrap_or_default())
    }
}

/// Keyboard-driven multi-select over the images in the start directory.
pub struct TerminalPicker;

impl Picker for TerminalPicker {
    fn pick(&self, start_dir: &Path) -> Result<Vec<PathBuf>> {
        let images = list_images(start_dir)?;
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = images
            .iter()
            .map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
            .collect();

        // `MultiSelect` toggles with space and confirms with enter.
        let chosen = MultiSelect::new()
            .with_prompt(format!("{DIALOG_TITLE} (space to toggle, enter to confirm)"))
            .items(&names)
            .interact()?;

        Ok(chosen.into_iter().map(|i| images[i].clone()).collect())
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENDED_IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Write `contents` to a fresh temp file and hand its path to `run`. The
/// file is removed before this returns, on success and on error alike.
pub fn with_script_file<T, F>(contents: &str, suffix: &str, run: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let mut script = tempfile::Builder::new()
        .prefix("imgbb-select-")
        .suffix(suffix)
        .tempfile()
        .context("Failed to create temporary script file")?;
    script.write_all(contents.as_bytes())?;
    script.flush()?;

    let result = run(script.path());
    let path = script.path().to_path_buf();
    if let Err(e) = script.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary script");
    }
    result
}

/// Split dialog output on `separator`, trimming entries and dropping blanks.
pub fn split_selection(output: &str, separator: char) -> Vec<PathBuf> {
    output
        .split(separator)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn apple_script(start_dir: &Path) -> String {
    format!(
        r#"tell application "System Events"
    activate
    set fileList to choose file with prompt "{title} (hold Cmd to select several)" with multiple selections allowed of type {{"public.image"}} default location POSIX file "{dir}"
    set pathList to {{}}
    repeat with aFile in fileList
        set end of pathList to POSIX path of aFile
    end repeat
    set AppleScript's text item delimiters to linefeed
    return pathList as text
end tell
"#,
        title = DIALOG_TITLE,
        dir = apple_script_escape(&start_dir.to_string_lossy()),
    )
}

pub(crate) fn apple_script_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

pub(crate) fn powershell_quote(s: &str) -> String {
    s.replace('\'', "''")
}
