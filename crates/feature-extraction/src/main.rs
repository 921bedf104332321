//! CMS Feature Extraction - Command Line Entry Point

use anyhow::{bail, Context, Result};
use feature_extraction::{init_logging, run, write_rows, ExtractionConfig};
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: cms-features <config.toml>");
    };

    let config = ExtractionConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    init_logging(config.verbosity).context("failed to set tracing subscriber")?;

    info!("=== CMS Features v{} ===", env!("CARGO_PKG_VERSION"));

    let rows = run(&config)?;
    write_rows(&rows, config.output.as_deref())?;

    Ok(())
}
