//! Configuration file handling for the wizard's tunables.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes. Unknown fields are rejected to catch typos.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::collaborators::scoring::DEFAULT_KEYWORD_LIMIT;
use crate::collaborators::upload::DEFAULT_MAX_UPLOAD_BYTES;
use crate::types::ExportFormat;

/// Wizard settings that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WizardConfig {
    /// Largest resume file accepted, in bytes
    pub max_upload_bytes: u64,
    /// Simulated payment confirmation delay
    pub payment_delay_ms: u64,
    /// Interval between optimizer progress reports
    pub build_tick_ms: u64,
    /// Progress added per optimizer tick (1-100)
    pub build_step_percent: u8,
    /// Number of job-description keywords the ATS check looks at
    pub keyword_limit: usize,
    /// Where exported resumes are written
    pub output_dir: PathBuf,
    /// Preselected download format
    pub default_format: ExportFormat,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            payment_delay_ms: 2000,
            build_tick_ms: 300,
            build_step_percent: 5,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            output_dir: PathBuf::from("."),
            default_format: ExportFormat::Pdf,
        }
    }
}

impl WizardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write settings as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Read settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load and validate in one go; `None` yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }

        if self.build_step_percent == 0 || self.build_step_percent > 100 {
            anyhow::bail!(
                "build_step_percent must be between 1 and 100 (got {})",
                self.build_step_percent
            );
        }

        if self.keyword_limit == 0 {
            anyhow::bail!("keyword_limit must be greater than zero");
        }

        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("output_dir must be specified");
        }

        Ok(())
    }

    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    pub fn build_tick(&self) -> Duration {
        Duration::from_millis(self.build_tick_ms)
    }

    /// Same settings with every simulated delay removed.
    pub fn without_delays(mut self) -> Self {
        self.payment_delay_ms = 0;
        self.build_tick_ms = 0;
        self
    }
}
