//! Command-line interface for uplift.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "uplift")]
#[command(about = "Accept quality upgrades and track the best quality seen per identifier", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the upgrade database (default: ~/.uplift/upgrade.db)
    #[arg(long, global = true, env = "UPLIFT_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Configuration file (.toml, .json or .yaml). Without it, options are
    /// read from UPLIFT_* environment variables.
    #[arg(short, long, global = true, env = "UPLIFT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decide upgrades for a batch and print the batch with updated dispositions
    Filter {
        /// JSON array of items, or `-` for stdin
        batch: String,
    },
    /// Record the best accepted quality of each identifier in a batch
    Learn {
        /// JSON array of items, or `-` for stdin
        batch: String,
    },
    /// List tracked records, most recent first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the tracked record of one identifier
    Forget {
        /// Identifier to forget (case-insensitive)
        identifier: String,
    },
    /// Forget every tracked record
    Clear,
}

impl Cli {
    /// Database path, falling back to `~/.uplift/upgrade.db`.
    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".uplift")
                .join("upgrade.db")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_from_stdin() {
        let cli = Cli::try_parse_from(["uplift", "filter", "-"]).unwrap();
        assert!(matches!(cli.command, Commands::Filter { ref batch } if batch == "-"));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uplift",
            "list",
            "--json",
            "--db",
            "/tmp/upgrade.db",
            "--config",
            "upgrade.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::List { json: true }));
        assert_eq!(cli.db_path(), PathBuf::from("/tmp/upgrade.db"));
        assert_eq!(cli.config, Some(PathBuf::from("upgrade.toml")));
    }

    #[test]
    fn test_forget_requires_identifier() {
        assert!(Cli::try_parse_from(["uplift", "forget"]).is_err());
        let cli = Cli::try_parse_from(["uplift", "forget", "Show.S01E01"]).unwrap();
        assert!(matches!(cli.command, Commands::Forget { ref identifier } if identifier == "Show.S01E01"));
    }

    #[test]
    fn test_default_db_path() {
        let cli = Cli {
            db: None,
            config: None,
            command: Commands::Clear,
        };
        assert!(cli.db_path().ends_with(".uplift/upgrade.db"));
    }
}
