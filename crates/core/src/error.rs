use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the translation core. Configuration errors and
/// subprocess failures both end the run; the binary decides the exit path.
#[derive(Debug, Error)]
pub enum FrontError {
    #[error("{0} is not a preprogrammed resolution. Enter it as w:h in the 'resolution' field, e.g. \"1280:720\"")]
    UnknownResolution(String),

    #[error("unable to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse settings JSON: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("loudness measurement pass failed with exit status {status:?}")]
    MeasureFailed {
        status: Option<i32>,
        stderr: String,
    },

    #[error("no loudnorm statistics object found in measurement output")]
    MeasureJson { stderr: String },

    #[error("failed to execute {what}: {source}")]
    Spawn {
        what: &'static str,
        source: std::io::Error,
    },
}

impl FrontError {
    /// Raw subprocess diagnostic text captured alongside the failure, if any.
    /// The top-level handler writes this to the run log for post-mortem.
    pub fn diagnostic_output(&self) -> Option<&str> {
        match self {
            FrontError::MeasureFailed { stderr, .. } => Some(stderr),
            FrontError::MeasureJson { stderr } => Some(stderr),
            _ => None,
        }
    }
}
