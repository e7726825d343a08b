use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use stepchain_core::{Config, CONFIG_FILE_NAME};
use tempfile::TempDir;

/// Isolated directory for configuration files
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self { dir })
    }

    /// Create workspace with a stepchain.toml holding `content`
    pub fn with_config(content: &str) -> Result<Self> {
        let workspace = Self::empty()?;
        workspace.write_file(CONFIG_FILE_NAME, content.as_bytes())?;
        Ok(workspace)
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Load the configuration from this workspace
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(self.path())?)
    }

    /// Write file to workspace
    pub fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.path().join(path);
        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write file: {}", path))?;
        Ok(())
    }

    /// Read file from workspace as text
    pub fn read_file(&self, path: &str) -> Result<String> {
        let full_path = self.path().join(path);
        fs::read_to_string(&full_path).with_context(|| format!("Failed to read file: {}", path))
    }

    /// Check if file exists
    pub fn file_exists(&self, path: &str) -> bool {
        self.path().join(path).exists()
    }
}
