//! Subcommand handlers.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;
use uplift_core::{
    Batch, Item, LearnReport, PreparedConfig, SqliteUpgradeStore, UpgradeConfig, UpgradeEngine,
    UpgradeOptions, UpgradeStore,
};

use crate::cli::{Cli, Commands};

pub fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db_path();
    match &cli.command {
        Commands::Filter { batch } => {
            let items = read_batch(batch)?;
            let Some(config) = load_config(cli.config.as_deref())? else {
                info!("Upgrade disabled, passing batch through");
                return write_json(&items);
            };
            let engine = UpgradeEngine::new(open_store(&db_path)?, config);
            let mut batch = Batch::from(items);
            engine.filter(&mut batch)?;
            write_json(&batch.into_entries())
        }
        Commands::Learn { batch } => {
            let items = read_batch(batch)?;
            let Some(config) = load_config(cli.config.as_deref())? else {
                info!("Upgrade disabled, nothing to learn");
                return write_json(&LearnReport::default());
            };
            let engine = UpgradeEngine::new(open_store(&db_path)?, config);
            let report = engine.learn(&Batch::from(items))?;
            write_json(&report)
        }
        Commands::List { json } => {
            let records = open_store(&db_path)?.list()?;
            if *json {
                return write_json(&records);
            }
            let mut out = io::stdout().lock();
            for record in &records {
                writeln!(out, "{record}")?;
            }
            Ok(())
        }
        Commands::Forget { identifier } => {
            if !open_store(&db_path)?.forget(identifier)? {
                bail!("No upgrade record for `{identifier}`");
            }
            println!("Forgot {identifier}");
            Ok(())
        }
        Commands::Clear => {
            let removed = open_store(&db_path)?.clear()?;
            println!("Removed {removed} upgrade records");
            Ok(())
        }
    }
}

fn open_store(path: &Path) -> Result<SqliteUpgradeStore> {
    info!("Upgrade database: {}", path.display());
    SqliteUpgradeStore::new(path)
        .with_context(|| format!("failed to open upgrade database {}", path.display()))
}

/// Prepared configuration from a file, or from the environment when no file
/// is given. `None` when upgrades are disabled.
fn load_config(path: Option<&Path>) -> Result<Option<PreparedConfig>> {
    let config = match path {
        Some(path) => UpgradeConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => UpgradeConfig::from(UpgradeOptions::from_env()?),
    };
    Ok(config.prepare()?)
}

fn read_batch(source: &str) -> Result<Vec<Item>> {
    let items = if source == "-" {
        serde_json::from_reader(io::stdin().lock()).context("failed to read batch from stdin")?
    } else {
        let file = File::open(source).with_context(|| format!("failed to open batch {source}"))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse batch {source}"))?
    };
    Ok(items)
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_batch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "Show.S01E01.720p", "id": "show.s01e01"}}, {{"title": "Other"}}]"#
        )
        .unwrap();

        let items = read_batch(file.path().to_str().unwrap()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_deref(), Some("show.s01e01"));
    }

    #[test]
    fn test_load_config_disabled_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upgrade.json");
        std::fs::write(&path, "false").unwrap();

        assert!(load_config(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn test_load_config_rejects_bad_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upgrade.toml");
        std::fs::write(&path, "target = \"nonsense\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
