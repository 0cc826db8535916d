//! Crate-level constants.

/// Default number of trials performed for every run configuration.
pub const NUM_TRIES: u32 = 5;

/// Locale counts used when running directly on the local machine.
pub const LOCAL_LOCALES: &[u32] = &[1, 2, 4];

/// Locale counts used when running directly with a square locale layout.
pub const LOCAL_SQUARE_LOCALES: &[u32] = &[1, 4];

/// Locale counts used when submitting through the batch queue.
pub const BATCH_LOCALES: &[u32] = &[1, 2, 4, 8, 16, 32];

/// Locale counts used when submitting through the batch queue with a square locale layout.
pub const BATCH_SQUARE_LOCALES: &[u32] = &[1, 4, 9, 16, 25];

/// The radius analysis only supports two locales.
pub const STENCIL_LOCALES: &[u32] = &[2];

/// Stencil radii swept by the radius analysis.
pub const STENCIL_RADII: &[u32] = &[1, 10, 20, 50, 100, 200, 300, 400, 500];

/// Label of the line holding the result in a run's output.
pub const RESULT_LABEL: &str = "Rate";

/// Transpose tile size when running directly.
pub const LOCAL_TILE_SIZE: u64 = 4;

/// Transpose tile size when submitting through the batch queue.
pub const BATCH_TILE_SIZE: u64 = 8;

/// Directory holding the benchmark executables, relative to the working directory.
pub const BIN_DIR: &str = "bin";

/// Directory receiving the runs' standard output.
pub const OUT_DIR: &str = "out";

/// Directory receiving the batch jobs' standard error.
pub const ERR_DIR: &str = "err";

/// Directory receiving the batch wrapper scripts.
pub const SCRIPTS_DIR: &str = "scripts";

/// Default chart output directory.
pub const PLOT_DIR: &str = "plots";

/// Batch queue submission command.
pub const SBATCH: &str = "sbatch";

/// Make target cleaning up after a sweep.
pub const CLEANUP_TARGET: &str = "cleanslurm";

/// Chart dimensions in pixels.
pub const CHART_SIZE: (u32, u32) = (1000, 1000);

/// Number of bytes in a mebibyte, used for memory footprints.
pub const BYTES_PER_MB: f64 = 1_048_576.0;
