// Entrypoint for the CLI application.
// - Keeps `main` small: read settings, build the collaborators for this
//   platform and hand everything to the batch runner.
// - Fatal errors are printed once and turned into exit code 1.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use imgbb_upload::{
    batch::{self, Collaborators},
    cli::Cli,
    config::Config,
    paths::resolve_paths,
    platform::{self, Platform},
    ui::Console,
    AppError, ImgbbClient,
};

fn setup_logs(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imgbb_upload={default_level},imgbb={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = Config::load(cli);

    // Missing key is fatal before any dialog or network call.
    if let Err(e) = config.require_api_key() {
        return Ok(report_fatal(&e));
    }

    let os = Platform::detect();
    tracing::debug!(?os, endpoint = %config.endpoint, "starting");

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let picker = platform::picker_for(os, cli.picker);
    let paths = match resolve_paths(&cli.paths, &cwd, picker.as_ref(), &config.start_dir) {
        Ok(paths) => paths,
        Err(e) => return Ok(report_fatal(&e)),
    };

    let uploader = ImgbbClient::from_config(&config).context("Failed to build HTTP client")?;
    let clipboard = platform::clipboard_for(os, !cli.no_clipboard);
    let notifier = platform::notifier_for(os, !cli.no_notify);
    let collab = Collaborators {
        uploader: &uploader,
        clipboard: clipboard.as_deref(),
        notifier: notifier.as_ref(),
    };

    let result = batch::run(&paths, &collab, &Console::new(cli.quiet));
    if let Err(e) = &result {
        report_fatal(e);
    }
    Ok(batch::exit_code(&result))
}

fn report_fatal(err: &AppError) -> u8 {
    eprintln!("error: {err}");
    err.exit_code()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logs(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
