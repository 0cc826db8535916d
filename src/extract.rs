//! Result extraction from the captured output of a run.
//!
//! The benchmarks print a line such as `Rate (MFlops/s): 1234.5  Avg time (s): 0.25`. The value
//! of interest is the third whitespace-delimited field of the first line containing the label.

use crate::error::{Result, SweepError};

use tracing::debug;

use std::{fs, path::Path};

/// Returns the value on the first line of `text` containing `label`.
///
/// `origin` only names the source of `text` in errors.
pub fn parse_value(text: &str, label: &str, origin: &Path) -> Result<f64> {
    let line = text
        .lines()
        .find(|line| line.contains(label))
        .ok_or_else(|| SweepError::LabelNotFound {
            path: origin.to_path_buf(),
            label: label.to_string(),
        })?;

    let token = line
        .split_whitespace()
        .nth(2)
        .ok_or_else(|| SweepError::MissingField {
            path: origin.to_path_buf(),
            line: line.to_string(),
        })?;

    token
        .parse::<f64>()
        .map_err(|source| SweepError::MalformedValue {
            path: origin.to_path_buf(),
            token: token.to_string(),
            source,
        })
}

/// Reads the output file at `path` and extracts its value.
pub fn extract_value(path: &Path, label: &str) -> Result<f64> {
    let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
    let value = parse_value(&text, label, path)?;
    debug!(path = %path.display(), value, "extracted result");
    Ok(value)
}
