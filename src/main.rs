use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use slack_archive::Config;
use slack_archive::cli::{self, Cli};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    init_logging();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    cli::run(cli, config).await
}

fn init_logging() {
    let directive = log_directive(
        std::env::var("RUST_LOG").ok(),
        std::env::var("LOG_LEVEL").ok(),
    );
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}

/// `RUST_LOG` may carry per-module directives; `LOG_LEVEL` is a single level
fn log_directive(rust_log: Option<String>, log_level: Option<String>) -> String {
    if let Some(rust_log) = rust_log {
        return rust_log;
    }
    let level = log_level.map(|level| level.to_lowercase());
    match level.as_deref() {
        Some(level @ ("trace" | "debug" | "info" | "warn" | "error")) => level.to_string(),
        Some("warning") => "warn".to_string(),
        _ => DEFAULT_LOG_LEVEL.to_string(),
    }
}
