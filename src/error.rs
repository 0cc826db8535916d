//! Error types.

use std::{io, num::ParseFloatError, path::PathBuf};

use thiserror::Error;

/// Errors raised while configuring, launching or post-processing a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to access `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no line containing `{label}` in `{path}`")]
    LabelNotFound { path: PathBuf, label: String },

    #[error("line `{line}` in `{path}` has no third field")]
    MissingField { path: PathBuf, line: String },

    #[error("malformed value `{token}` in `{path}`")]
    MalformedValue {
        path: PathBuf,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("memory dump `{path}`: {reason}")]
    MalformedDump { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no results for version `{0}`")]
    UnknownVersion(String),

    #[error("command `{command}` failed to launch")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl SweepError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
