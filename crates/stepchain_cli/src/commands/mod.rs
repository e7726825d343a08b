//! CLI commands.

pub mod config;
pub mod demo;
pub mod init;

use anyhow::{anyhow, Result};
use std::path::Path;
use stepchain_core::Config;

/// Loads stepchain.toml from `dir`, attaching the recovery hint to errors.
fn load_config(dir: &Path) -> Result<Config> {
    Config::load(dir).map_err(|e| match e.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n  hint: {}", e, hint),
        None => e.into(),
    })
}
