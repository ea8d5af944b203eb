pub mod cli;
pub mod commands;
pub mod core;
pub mod inventory;
pub mod manuals;
pub mod sidecar;
pub mod workbook;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn log_level_from_env() -> &'static str {
    match std::env::var("DOCBRAIN_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn http_debug_enabled() -> bool {
    matches!(
        std::env::var("DOCBRAIN_HTTP_DEBUG")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_logging() {
    let level = log_level_from_env();
    let directives = if http_debug_enabled() {
        level.to_string()
    } else {
        format!("{level},reqwest=warn,hyper=warn,hyper_util=warn,rustls=warn")
    };
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match commands::execute(cli.command) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(code = err.code(), "{err}");
            eprintln!("[ERROR] {err}");
            ExitCode::FAILURE
        }
    }
}
