// Configuration is resolved from CLI flags, the process environment and
// optional `.env` files. `.env` values never override variables that are
// already set in the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::cli::Cli;
use crate::error::AppError;

pub const ENV_API_KEY: &str = "IMGBB_API_KEY";
pub const ENV_API_URL: &str = "IMGBB_API_URL";
pub const ENV_START_DIR: &str = "IMGBB_START_DIR";

pub const DEFAULT_API_URL: &str = "https://api.imgbb.com/1/upload";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub start_dir: PathBuf,
    pub retries: u32,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load `.env` files and build the configuration from the environment
    /// and the parsed command line.
    pub fn load(cli: &Cli) -> Self {
        load_env_files();
        Self::from_lookup(cli, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let start_dir = cli
            .start_dir
            .clone()
            .or_else(|| non_blank(ENV_START_DIR).map(PathBuf::from))
            .unwrap_or_else(default_start_dir);

        Config {
            api_key: non_blank(ENV_API_KEY),
            endpoint: non_blank(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            start_dir,
            retries: cli.retries,
            timeout: cli.timeout.map(Duration::from_secs),
        }
    }

    /// The API key, or a fatal configuration error when it is missing.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config(format!("{ENV_API_KEY} is not set (environment or .env file)")))
    }
}

/// Candidate `.env` files, most specific first.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("imgbb-upload").join(".env"));
    }
    candidates
}

fn load_env_files() {
    for path in env_file_candidates() {
        if !path.is_file() {
            continue;
        }
        match dotenv::from_path(&path) {
            Ok(()) => debug!(path = %path.display(), "loaded env file"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to load env file"),
        }
    }
}

fn default_start_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}
