//! uplift - command-line driver for the upgrade filter and learn phases.
//!
//! Batches are JSON arrays of items read from a file or stdin:
//!
//! ```json
//! [
//!   { "title": "Show.S01E01.720p.HDTV", "id": "show.s01e01" },
//!   { "title": "Show.S01E01.1080p.WEB-DL", "id": "show.s01e01" }
//! ]
//! ```
//!
//! # Configuration
//!
//! - `UPLIFT_DB_PATH` - Optional, defaults to `~/.uplift/upgrade.db`
//! - `UPLIFT_CONFIG` - Optional config file; otherwise `UPLIFT_IDENTIFIED_BY`,
//!   `UPLIFT_TRACKING`, `UPLIFT_TARGET` and `UPLIFT_ON_LOWER` are read

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;

use cli::Cli;

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout carries the JSON output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli) {
        tracing::error!("uplift failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
