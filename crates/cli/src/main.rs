//! `stockfile` entry point: interactive inventory menu over a flat file.

use std::io;

use anyhow::Context;
use stockfile_cli::{Config, menu};

fn main() -> anyhow::Result<()> {
    stockfile_observability::init();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        data_file = %config.data_file.display(),
        durability = ?config.durability,
        "starting inventory menu"
    );

    let mut store = config
        .open_store()
        .with_context(|| format!("failed to open inventory at {}", config.data_file.display()))?;

    // On an early return the store still saves itself when dropped.
    menu::run(&mut store, io::stdin().lock(), io::stdout().lock())
        .context("console I/O failed")?;

    store
        .close()
        .with_context(|| format!("failed to save inventory to {}", config.data_file.display()))?;
    Ok(())
}
