// Desktop notifications: the messages shown for each upload and for the
// whole run, and the per-platform commands that display them.

use anyhow::Result;

use super::command::run;
use super::picker::{apple_script_escape, powershell_quote};
use super::Platform;

const APP_NAME: &str = "ImgBB Uploader";
const MAX_DETAIL_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A desktop notification ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn upload_success(file_name: &str, url: &str) -> Self {
        Self {
            title: "Upload succeeded".into(),
            message: format!("{file_name}\n{}", shorten(url)),
            kind: NotificationKind::Success,
        }
    }

    pub fn upload_failed(file_name: &str, error: &str) -> Self {
        Self {
            title: "Upload failed".into(),
            message: format!("{file_name}\n{}", shorten(error)),
            kind: NotificationKind::Error,
        }
    }

    /// `copied` says whether the last uploaded URL is on the clipboard.
    pub fn upload_complete(succeeded: usize, total: usize, copied: bool) -> Self {
        if succeeded == total {
            let message = if copied {
                format!("{succeeded} file(s) uploaded\nURL copied to clipboard.")
            } else {
                format!("{succeeded} file(s) uploaded")
            };
            Self {
                title: "Upload complete".into(),
                message,
                kind: NotificationKind::Success,
            }
        } else {
            Self {
                title: "Upload complete".into(),
                message: format!("{succeeded}/{total} files uploaded"),
                kind: NotificationKind::Info,
            }
        }
    }
}

/// Truncate to at most 50 characters, marking the cut with "...".
pub fn shorten(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_LEN {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_DETAIL_LEN - 3).collect();
    format!("{head}...")
}

pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<()>;
}

pub struct CommandNotifier {
    platform: Platform,
}

impl CommandNotifier {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, n: &Notification) -> Result<()> {
        match self.platform {
            Platform::MacOs => run("osascript", &["-e", &apple_notification_script(n)]),
            Platform::Windows => {
                let script = windows_toast_script(n);
                run("powershell", &["-NoProfile", "-Command", &script]).or_else(|e| {
                    tracing::debug!(error = %e, "toast notification failed, falling back to msg");
                    run("msg", &["*", &format!("{}: {}", n.title, n.message)])
                })
            }
            Platform::Linux => {
                let args = notify_send_args(n);
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                run("notify-send", &args)
            }
        }
    }
}

/// Used with `--no-notify`.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

/// Options first, then `--` so a title or message starting with `-` is
/// never read as an option.
fn notify_send_args(n: &Notification) -> Vec<String> {
    vec![
        format!("--icon={}", freedesktop_icon(n.kind)),
        format!("--app-name={APP_NAME}"),
        "--".to_string(),
        n.title.clone(),
        n.message.clone(),
    ]
}

fn freedesktop_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Error => "dialog-error",
        NotificationKind::Success | NotificationKind::Info => "dialog-information",
    }
}

fn apple_notification_script(n: &Notification) -> String {
    let subtitle = match n.kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✗",
        NotificationKind::Info => "ℹ",
    };
    format!(
        r#"display notification "{}" with title "{}" subtitle "{}" sound name "Glass""#,
        apple_script_escape(&n.message),
        apple_script_escape(&n.title),
        subtitle
    )
}

fn windows_toast_script(n: &Notification) -> String {
    format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] | Out-Null; \
         $template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02); \
         $text = $template.GetElementsByTagName('text'); \
         $text.Item(0).AppendChild($template.CreateTextNode('{title}')) | Out-Null; \
         $text.Item(1).AppendChild($template.CreateTextNode('{message}')) | Out-Null; \
         $toast = [Windows.UI.Notifications.ToastNotification]::new($template); \
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{app}').Show($toast)",
        title = powershell_quote(&n.title),
        message = powershell_quote(&n.message),
        app = APP_NAME,
    )
}
