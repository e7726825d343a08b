//! Show the effective configuration.

use anyhow::Result;
use console::style;
use std::path::Path;
use stepchain_core::CONFIG_FILE_NAME;

pub fn show(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    let config = super::load_config(dir)?;

    let source = if path.exists() {
        path.display().to_string()
    } else {
        "defaults (no config file)".to_string()
    };
    println!("{} {}", style("Source:").bold(), source);
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
