//! Utility functions.

use crate::error::{Result, SweepError};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use std::{
    fs::OpenOptions,
    io::{stdout, Write},
    path::Path,
};

/// Installs the global `tracing` subscriber, logging to `stderr` at the `info` level unless
/// overridden by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .unwrap_or_else(|e| {
            eprintln!("failed to init logger: {e}");
        });
}

/// Opens the output of the aggregate tables: the given file, truncated, or `stdout`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(name) => Box::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(name)
                .map_err(|e| SweepError::io(name, e))?,
        ),
        None => Box::new(stdout()),
    })
}
