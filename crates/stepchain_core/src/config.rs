//! Configuration for reporting.

use crate::error::{Result, StepchainError};
use crate::reporter::{ConsoleReporter, QuietReporter, Reporter, TracingReporter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// File name looked up by [`Config::load`].
pub const CONFIG_FILE_NAME: &str = "stepchain.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Reporting configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from `stepchain.toml` in `dir`.
    ///
    /// A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| StepchainError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| StepchainError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `stepchain.toml` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE_NAME);
        let content = self.to_toml()?;
        fs::write(&path, content)
            .map_err(|e| StepchainError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StepchainError::ConfigError(format!("failed to serialize config: {}", e)))
    }

    /// Builds the reporter described by `self.report`.
    pub fn build_reporter(&self) -> Arc<dyn Reporter> {
        let report = &self.report;
        match report.kind {
            ReporterKind::Console => Arc::new(
                ConsoleReporter::stdout()
                    .with_color(report.color)
                    .with_timings(report.show_timings),
            ),
            ReporterKind::Tracing => {
                Arc::new(TracingReporter::new().with_timings(report.show_timings))
            }
            ReporterKind::Quiet => Arc::new(QuietReporter),
        }
    }
}

/// Reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Which reporter receives step notifications (default: console).
    pub kind: ReporterKind,

    /// Style the console labels with ANSI colors (default: false).
    pub color: bool,

    /// Forward timing notifications from timed steps (default: true).
    pub show_timings: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            kind: ReporterKind::Console,
            color: false,
            show_timings: true,
        }
    }
}

/// Available reporter implementations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Line-oriented text on stdout.
    #[default]
    Console,
    /// `tracing` events.
    Tracing,
    /// No output.
    Quiet,
}

impl FromStr for ReporterKind {
    type Err = StepchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "tracing" => Ok(Self::Tracing),
            "quiet" => Ok(Self::Quiet),
            other => Err(StepchainError::UnknownReporter(other.to_string())),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Console => "console",
            Self::Tracing => "tracing",
            Self::Quiet => "quiet",
        };
        f.write_str(name)
    }
}
