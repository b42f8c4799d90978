// Subprocess helpers shared by the platform collaborators.

use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

pub fn command_exists(command: &str) -> bool {
    let check = if cfg!(windows) {
        Command::new("where").arg(command).output()
    } else {
        Command::new("which").arg(command).output()
    };

    matches!(check, Ok(output) if output.status.success())
}

/// Outcome of a command whose non-zero exit is meaningful (e.g. a dialog
/// that was cancelled), as opposed to a command that failed to start.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

/// Run a command, capturing stdout. stdin is closed and stderr discarded.
pub fn capture(command: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute '{command}'"))?;

    let stdout = String::from_utf8(output.stdout)
        .with_context(|| format!("Invalid UTF-8 output from '{command}'"))?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout,
    })
}

/// Run a command to completion and fail on a non-zero exit status.
pub fn run(command: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Failed to execute '{command}'"))?;

    if !status.success() {
        return Err(anyhow!("'{}' failed with exit code {:?}", command, status.code()));
    }
    Ok(())
}

/// Spawn a command, write `input` to its stdin, close it and wait.
pub fn pipe_to(command: &str, args: &[&str], input: &str) -> Result<()> {
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to execute '{command}'"))?;

    // Dropping the handle closes the pipe so the child sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Ok(()),
    };

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for '{command}'"))?;
    written.with_context(|| format!("Failed to write to '{command}'"))?;

    if !status.success() {
        return Err(anyhow!("'{}' failed with exit code {:?}", command, status.code()));
    }
    Ok(())
}
