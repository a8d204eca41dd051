//! Runner configuration
//!
//! Handles:
//! - YAML file located by `GPFLEET_CONFIG` (default `gpfleet.yaml`)
//! - Inline or file-based topology snapshot
//! - `GPFLEET_COMMAND` override for the command template

use anyhow::{Context, Result};
use gpfleet_kernel::{load_segments, Scope, SegConfig, SegmentRow};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

pub const CONFIG_ENV: &str = "GPFLEET_CONFIG";
pub const COMMAND_ENV: &str = "GPFLEET_COMMAND";
const DEFAULT_CONFIG_FILE: &str = "gpfleet.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Diagnostic sink; stderr when unset
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub segments_file: Option<PathBuf>,
    pub segments: Vec<SegmentRow>,
    pub scope: Scope,
    /// Placeholders: {content} {dbid} {host} {port} {datadir}
    pub command: String,
    pub verbose_message: String,
    pub error_message: String,
    pub non_fatal: bool,
    pub max_concurrency: Option<NonZeroUsize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: "info".to_string(),
            segments_file: None,
            segments: Vec::new(),
            scope: Scope::OnSegments,
            command: String::new(),
            verbose_message: "Running command on cluster".to_string(),
            error_message: "Command failed".to_string(),
            non_fatal: false,
            max_concurrency: None,
        }
    }
}

impl RunnerConfig {
    /// Load from `GPFLEET_CONFIG`. A missing file gives defaults, an invalid one is an error.
    pub async fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        let mut config = if Path::new(&path).exists() {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {path}"))?;
            Self::from_yaml(&text).with_context(|| format!("Invalid configuration in {path}"))?
        } else {
            Self::default()
        };

        if let Ok(command) = std::env::var(COMMAND_ENV) {
            config.command = command;
        }
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Segment snapshot: `segments_file` wins over inline rows
    pub async fn load_segments(&self) -> Result<Vec<SegConfig>> {
        match &self.segments_file {
            Some(path) => load_segments(path)
                .await
                .with_context(|| format!("Failed to load segments from {}", path.display())),
            None => Ok(self.segments.iter().cloned().map(SegConfig::from).collect()),
        }
    }

    pub fn level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::INFO)
    }

    /// How fatal summaries refer to the diagnostic sink
    pub fn log_sink_name(&self) -> String {
        match &self.log_file {
            Some(path) => path.display().to_string(),
            None => "stderr".to_string(),
        }
    }
}
