use crate::error::FrontError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Loudness statistics printed by ffmpeg's loudnorm filter with
/// `print_format=json`. ffmpeg formats every value as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnormStats {
    pub input_i: String,
    pub input_tp: String,
    pub input_lra: String,
    pub input_thresh: String,
    pub output_i: String,
    pub output_tp: String,
    pub output_lra: String,
    pub output_thresh: String,
    pub normalization_type: String,
    pub target_offset: String,
}

/// Analysis-pass filter. The targets match the second pass and are the
/// streaming-standard values, so they are fixed rather than configurable.
pub const MEASURE_FILTER: &str = "loudnorm=I=-16:TP=-1.5:LRA=11:print_format=json";

/// Run ffmpeg in analysis-only mode against `input` and parse the loudness
/// statistics it prints to stderr. This blocks until the subprocess exits;
/// the main encode is never started until measurement completes.
pub fn measure(input: &Path) -> Result<LoudnormStats, FrontError> {
    debug!("measuring loudness of {}", input.display());

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-vn", "-af", MEASURE_FILTER, "-f", "null", "-"])
        .output()
        .map_err(|source| FrontError::Spawn {
            what: "ffmpeg loudness measurement",
            source,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(FrontError::MeasureFailed {
            status: output.status.code(),
            stderr,
        });
    }

    extract_stats(&stderr)
}

/// Pull the loudnorm statistics object out of mixed diagnostic text.
///
/// The JSON block is not cleanly delimited from the human-readable lines
/// around it, so this scans for the last balanced-brace object in the text
/// that deserializes into LoudnormStats with a populated `input_i`. Brace
/// matching is string-aware so braces inside quoted values cannot unbalance
/// the scan.
pub fn extract_stats(text: &str) -> Result<LoudnormStats, FrontError> {
    let starts: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| *c == '{')
        .map(|(i, _)| i)
        .collect();

    for &start in starts.iter().rev() {
        let Some(end) = balanced_end(&text[start..]) else {
            continue;
        };
        let candidate = &text[start..start + end];
        if let Ok(stats) = serde_json::from_str::<LoudnormStats>(candidate) {
            if !stats.input_i.is_empty() {
                return Ok(stats);
            }
        }
    }

    Err(FrontError::MeasureJson {
        stderr: text.to_string(),
    })
}

/// Byte offset one past the brace that closes the object opening at the
/// start of `text`, or None if it never balances.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
