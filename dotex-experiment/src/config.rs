use crate::error::ExperimentError;
use dotex_core::{ColorValue, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use dotex_layout::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// A dot color together with the word shown to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChoice {
    pub color: ColorValue,
    pub word: String,
}

impl ColorChoice {
    pub fn new(color: ColorValue, word: impl Into<String>) -> Self {
        Self {
            color,
            word: word.into(),
        }
    }
}

/// Which layout draws the trial stimuli.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Hand-tuned grids picked by total.
    #[default]
    Grid,
    RejectionSampling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "RetryConfig::default_max_attempts_per_point")]
    pub max_attempts_per_point: usize,
    #[serde(default = "RetryConfig::default_max_restarts")]
    pub max_restarts: usize,
    /// Wall-clock budget per layout; unbounded when absent.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl RetryConfig {
    fn default_max_attempts_per_point() -> usize {
        RetryPolicy::default().max_attempts_per_point
    }
    fn default_max_restarts() -> usize {
        RetryPolicy::default().max_restarts
    }

    /// Builds a policy; the deadline clock starts now.
    pub fn policy(&self) -> RetryPolicy {
        let policy = RetryPolicy {
            max_attempts_per_point: self.max_attempts_per_point,
            max_restarts: self.max_restarts,
            deadline: None,
        };
        match self.deadline_ms {
            Some(ms) => policy.with_budget(Duration::from_millis(ms)),
            None => policy,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_point: Self::default_max_attempts_per_point(),
            max_restarts: Self::default_max_restarts(),
            deadline_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Dot totals to build stimuli for.
    #[serde(default = "ExperimentConfig::default_totals")]
    pub totals: Vec<usize>,
    #[serde(default = "ExperimentConfig::default_canvas_id")]
    pub canvas_id: String,
    #[serde(default = "ExperimentConfig::default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "ExperimentConfig::default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "ExperimentConfig::default_background")]
    pub background: ColorValue,
    /// The two dot colors; each trial picks which one is the target.
    #[serde(default = "ExperimentConfig::default_colors")]
    pub colors: [ColorChoice; 2],
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default = "ExperimentConfig::default_results_path")]
    pub results_path: PathBuf,
    #[serde(default = "ExperimentConfig::default_experiment_id")]
    pub experiment_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Between-subjects condition label copied into the results.
    #[serde(default)]
    pub condition: String,
}

impl ExperimentConfig {
    fn default_totals() -> Vec<usize> {
        vec![5, 10, 25, 100]
    }
    fn default_canvas_id() -> String {
        "situation".to_string()
    }
    fn default_canvas_width() -> u32 {
        DEFAULT_CANVAS_WIDTH as u32
    }
    fn default_canvas_height() -> u32 {
        DEFAULT_CANVAS_HEIGHT as u32
    }
    fn default_background() -> ColorValue {
        ColorValue::LIGHT_GREY
    }
    fn default_colors() -> [ColorChoice; 2] {
        [
            ColorChoice::new(ColorValue::BLACK, "black"),
            ColorChoice::new(ColorValue::WHITE, "white"),
        ]
    }
    fn default_results_path() -> PathBuf {
        PathBuf::from("experiment_results.json")
    }
    fn default_experiment_id() -> String {
        "dot-norming".to_string()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExperimentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExperimentError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ExperimentError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Falls back to defaults when `path` does not exist. Parse errors in
    /// an existing file are still reported.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ExperimentError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            totals: Self::default_totals(),
            canvas_id: Self::default_canvas_id(),
            canvas_width: Self::default_canvas_width(),
            canvas_height: Self::default_canvas_height(),
            background: Self::default_background(),
            colors: Self::default_colors(),
            layout: LayoutMode::default(),
            retry: RetryConfig::default(),
            results_path: Self::default_results_path(),
            experiment_id: Self::default_experiment_id(),
            author: String::new(),
            description: String::new(),
            condition: String::new(),
        }
    }
}
