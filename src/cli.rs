//! Command-Line Interface related code.
//!
//! This module handles the parsing of CLI arguments using the [`clap`][1] crate.
//! It defines the availables runtime options and subcommands.
//!
//! [1]: https://crates.io/crates/clap

use crate::consts;

use clap::{Args, Parser, Subcommand, ValueEnum};

use std::path::PathBuf;

/// Scaling sweeps of the Parallel Research Kernels.
///
/// Launches every version of a benchmark on a range of locale counts, both for strong scaling
/// (fixed problem size) and weak scaling (problem size growing with the number of locales), then
/// extracts, aggregates and plots the results.
#[derive(Clone, Debug, Parser)]
pub struct CliArgs {
    /// Benchmark directory, holding the `bin`, `out`, `err` and `scripts` directories.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Directory receiving the charts.
    #[arg(short, long, value_name = "DIR", default_value = consts::PLOT_DIR)]
    pub plot_dir: PathBuf,

    /// Output file for the aggregate tables, defaults to `stdout` if unspecified.
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Benchmark to sweep.
    #[command(subcommand)]
    pub benchmark: BenchmarkCmd,
}

/// List of available benchmarks.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum BenchmarkCmd {
    /// Dense matrix-matrix multiplication: C += A x B
    Dgemm(SweepArgs),
    /// Sparse matrix-vector multiplication
    Sparse(SweepArgs),
    /// Stencil radius analysis
    Stencil(SweepArgs),
    /// Matrix transposition: B += A^T
    Transpose(SweepArgs),
    /// Memory footprint comparison of the benchmark versions
    Memory(MemoryArgs),
}

/// Phase of the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum Mode {
    /// Launch the runs.
    Run,
    /// Extract, aggregate and plot the results of previous runs.
    Plot,
}

/// Cluster the batch jobs are submitted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Host {
    George,
    Pyramid,
}

impl Host {
    /// SLURM partition of the host.
    pub fn partition(self) -> &'static str {
        match self {
            Self::George => "hpcl",
            Self::Pyramid => "all",
        }
    }
}

/// Arguments shared by all benchmark subcommands.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct SweepArgs {
    /// Phase of the sweep.
    #[arg(value_enum, ignore_case = true)]
    pub mode: Mode,

    /// Strong-scaling problem size, also the weak-scaling size on the largest locale count.
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub size: u64,

    /// Number of trials per configuration.
    #[arg(
        default_value_t = consts::NUM_TRIES,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub num_tries: u32,

    /// Submit the runs through SLURM instead of running them directly.
    #[arg(long)]
    pub slurm: bool,

    /// Cluster to submit to, selects the SLURM partition.
    #[arg(long, value_enum, default_value_t = Host::Pyramid)]
    pub host: Host,

    /// Only use square numbers of locales.
    #[arg(long)]
    pub square: bool,

    /// Track the memory footprint of the runs.
    #[arg(long)]
    pub mem_track: bool,

    /// Use a logarithmic y axis.
    #[arg(long)]
    pub log_scale: bool,

    /// Draw the legend.
    #[arg(long)]
    pub legend: bool,

    /// Plot the speedup over the base version instead of raw values.
    #[arg(long)]
    pub speedup: bool,

    /// Print the commands without executing them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of the memory footprint chart.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct MemoryArgs {
    /// Footprint dump: one byte count per line, for each benchmark, for each version.
    pub dump: PathBuf,

    /// Benchmarks of the dump, in dump order.
    #[arg(
        short,
        long,
        num_args = 1..,
        default_values_t = ["DGEMM".to_string(), "Transpose".to_string(), "Sparse".to_string()],
    )]
    pub benchmarks: Vec<String>,

    /// Plot raw footprints in MB per locale instead of normalizing against the base version.
    #[arg(long)]
    pub raw: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_sweep_arguments() {
        let args = CliArgs::parse_from([
            "prk-sweep", "transpose", "run", "2048", "3", "--slurm", "--host", "george",
        ]);
        let BenchmarkCmd::Transpose(sweep) = args.benchmark else {
            panic!("unexpected command {:?}", args.benchmark);
        };
        assert_eq!(sweep.mode, Mode::Run);
        assert_eq!(sweep.size, 2048);
        assert_eq!(sweep.num_tries, 3);
        assert!(sweep.slurm);
        assert_eq!(sweep.host.partition(), "hpcl");
    }

    #[test]
    fn defaults_to_five_trials() {
        let args = CliArgs::parse_from(["prk-sweep", "dgemm", "plot", "512", "--legend"]);
        let BenchmarkCmd::Dgemm(sweep) = args.benchmark else {
            panic!("unexpected command {:?}", args.benchmark);
        };
        assert_eq!(sweep.num_tries, consts::NUM_TRIES);
        assert!(sweep.legend);
        assert!(!sweep.slurm);
    }

    #[test]
    fn mode_is_case_insensitive() {
        for (mode, expected) in [("RUN", Mode::Run), ("Plot", Mode::Plot), ("plot", Mode::Plot)] {
            let args = CliArgs::parse_from(["prk-sweep", "stencil", mode, "1000"]);
            let BenchmarkCmd::Stencil(sweep) = args.benchmark else {
                panic!("unexpected command {:?}", args.benchmark);
            };
            assert_eq!(sweep.mode, expected);
        }
    }

    #[test]
    fn rejects_zero_size() {
        assert!(CliArgs::try_parse_from(["prk-sweep", "sparse", "run", "0"]).is_err());
    }

    #[test]
    fn memory_defaults() {
        let args = CliArgs::parse_from(["prk-sweep", "memory", "dump.txt"]);
        match args.benchmark {
            BenchmarkCmd::Memory(mem) => {
                assert_eq!(mem.benchmarks, vec!["DGEMM", "Transpose", "Sparse"]);
                assert!(!mem.raw);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
