use crate::error::ExperimentError;
use dotex_core::TrialResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Machine the session ran on. Sizes are in physical pixels; the screen
/// stays zero until a window reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl SystemInfo {
    pub fn detect(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            screen_width: 0,
            screen_height: 0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }
}

/// Everything submitted at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub trials: Vec<TrialResult>,
    /// Attention checks; this experiment runs none.
    #[serde(default)]
    pub catch_trials: Vec<TrialResult>,
    #[serde(default)]
    pub system: SystemInfo,
    #[serde(default)]
    pub condition: String,
    /// Answers from the closing questionnaire.
    #[serde(default)]
    pub subject_information: Vec<String>,
    pub time_in_minutes: f64,
    pub experiment_id: String,
    pub author: String,
    pub description: String,
}

impl SessionRecord {
    pub fn to_json(&self) -> Result<String, ExperimentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExperimentError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ExperimentError::WriteResults {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), trials = self.trials.len(), "results written");
        Ok(())
    }
}
