//! TOML configuration file support.
//!
//! Settings shared by a whole set of cells can live in a config file
//! instead of being repeated on every invocation:
//!
//! ```toml
//! # stepclamp.toml
//! [input]
//! experiment = "uv"
//! sample_rate = 10000
//!
//! [analysis]
//! branch = "exp"
//! baseline_threshold = 0.1
//! baseline_window_samples = 30000
//! pre_window_seconds = 10
//! post_window_seconds = 20
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use stepclamp::analysis::{AnalysisConfig, ControlBranch};
use stepclamp::recording::ExperimentKind;

/// Root configuration structure for stepclamp.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where recordings come from.
    #[serde(default)]
    pub input: InputConfig,

    /// Measurement parameters.
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// Input selection settings.
#[derive(Debug, Default, Deserialize)]
pub struct InputConfig {
    /// Hold folder to analyze ("uv" or "drug").
    pub experiment: Option<String>,

    /// Sample rate override in Hz.
    pub sample_rate: Option<u32>,
}

/// Analysis settings; unset keys fall back to the library defaults.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisSection {
    /// Windowing policy name ("neg", "exp", ...).
    pub branch: Option<String>,

    pub baseline_threshold: Option<f64>,
    pub baseline_window_samples: Option<usize>,
    pub require_full_baseline: Option<bool>,
    pub pre_window_seconds: Option<f64>,
    pub post_window_seconds: Option<f64>,
    pub manual_window: Option<(usize, usize)>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Library defaults overlaid with the keys present in the file
    pub fn analysis_config(&self) -> AnalysisConfig {
        let a = &self.analysis;
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            baseline_threshold: a.baseline_threshold.unwrap_or(defaults.baseline_threshold),
            baseline_window_samples: a
                .baseline_window_samples
                .unwrap_or(defaults.baseline_window_samples),
            require_full_baseline: a
                .require_full_baseline
                .unwrap_or(defaults.require_full_baseline),
            pre_window_seconds: a.pre_window_seconds.unwrap_or(defaults.pre_window_seconds),
            post_window_seconds: a.post_window_seconds.unwrap_or(defaults.post_window_seconds),
            manual_window: a.manual_window.or(defaults.manual_window),
        }
    }

    /// Parsed branch, if the file names one
    pub fn branch(&self) -> Result<Option<ControlBranch>> {
        self.analysis
            .branch
            .as_deref()
            .map(ControlBranch::from_str)
            .transpose()
            .context("Invalid analysis.branch in config file")
    }

    /// Parsed experiment kind, if the file names one
    pub fn experiment(&self) -> Result<Option<ExperimentKind>> {
        self.input
            .experiment
            .as_deref()
            .map(|s| ExperimentKind::from_str(s).map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid input.experiment in config file")
    }
}
