use dotex_core::StimulusError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("reading config {path}: {source}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("parsing config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("writing results to {path}: {source}")]
    WriteResults { path: PathBuf, source: io::Error },
    #[error("encoding results: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Stimulus(#[from] StimulusError),
}
