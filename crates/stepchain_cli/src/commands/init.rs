//! Write a default stepchain.toml.

use anyhow::{bail, Context, Result};
use std::path::Path;
use stepchain_core::{Config, CONFIG_FILE_NAME};

/// Write the default configuration into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        bail!(
            "{} already exists. Use 'stepchain init --force' to overwrite it.",
            path.display()
        );
    }

    Config::default()
        .save(dir)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Configuration written to {}", path.display());
    Ok(())
}
