//! PRK-Sweep - Scaling sweeps of the Parallel Research Kernels
//!
//! # About
//! PRK-Sweep runs parameter sweeps of distributed micro-benchmarks and plots how their variants
//! compare. Each benchmark is compiled in several versions (baseline, hand-optimized, consistent
//! and inconsistent prefetching, with or without a static domain), and each version is run on a
//! range of locale counts, both for:
//! - strong scaling: the problem size stays fixed;
//! - weak scaling: the problem size grows with the number of locales so that the work per locale
//!   stays constant.
//!
//! Currently, PRK-Sweep can sweep the following benchmarks:
//! - DGEMM (dense matrix-matrix multiplication)
//! - Sparse (sparse matrix-vector multiplication)
//! - Stencil (radius analysis of a star-shaped stencil)
//! - Transpose (matrix transposition)
//!
//! # Quickstart
//! ## Pre-requisites
//! The benchmark executables must be built beforehand in the `bin` directory of the benchmark
//! directory. Batch submissions require a [SLURM][1] installation.
//!
//! ## Build
//! ```sh
//! cargo build --release
//! ```
//!
//! ## Help
//! ```sh
//! cargo run -- help
//!
//! Scaling sweeps of the Parallel Research Kernels.
//!
//! Usage: prk-sweep [OPTIONS] <COMMAND>
//!
//! Commands:
//!   dgemm      Dense matrix-matrix multiplication: C += A x B
//!   sparse     Sparse matrix-vector multiplication
//!   stencil    Stencil radius analysis
//!   transpose  Matrix transposition: B += A^T
//!   memory     Memory footprint comparison of the benchmark versions
//!   help       Print this message or the help of the given subcommand(s)
//!
//! Options:
//!   -w, --workdir <DIR>            Benchmark directory, holding the `bin`, `out`, `err` and `scripts` directories [default: .]
//!   -p, --plot-dir <DIR>           Directory receiving the charts [default: plots]
//!   -o, --output-file <OUTPUT_FILE> Output file for the aggregate tables, defaults to `stdout` if unspecified
//!   -h, --help                     Print help (see more with '--help')
//! ```
//!
//! ## Example sweep
//! Submit 5 trials of every Transpose version on up to 32 locales, with a 16384x16384 matrix:
//! ```sh
//! prk-sweep -w Transpose transpose run 16384 5 --slurm --host pyramid
//! ```
//! Once all jobs have completed, aggregate and plot the results:
//! ```sh
//! prk-sweep -w Transpose -o transpose.csv transpose plot 16384 5 --slurm --legend
//! ```
//!
//! [1]: https://slurm.schedmd.com

pub mod catalog;
pub mod charts;
pub mod cli;
pub mod config;
pub mod consts;
pub mod drivers;
pub mod error;
pub mod extract;
pub mod memory;
pub mod perf_report;
pub mod radius;
pub mod utils;

use crate::{
    catalog::BenchmarkKind,
    charts::ChartOptions,
    cli::{BenchmarkCmd, CliArgs, MemoryArgs, Mode, SweepArgs},
    config::SweepConfig,
    drivers::{DryRunLauncher, ShellLauncher},
    memory::FootprintTable,
    perf_report::ResultTable,
    radius::RadiusAnalysis,
    utils::*,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use std::io::Write;

fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();

    match args.benchmark {
        BenchmarkCmd::Dgemm(ref sweep) => run(&args, BenchmarkKind::Dgemm, sweep),
        BenchmarkCmd::Sparse(ref sweep) => run(&args, BenchmarkKind::Sparse, sweep),
        BenchmarkCmd::Stencil(ref sweep) => run(&args, BenchmarkKind::Stencil, sweep),
        BenchmarkCmd::Transpose(ref sweep) => run(&args, BenchmarkKind::Transpose, sweep),
        BenchmarkCmd::Memory(ref mem) => memory(&args, mem),
    }
}

fn run(args: &CliArgs, benchmark: BenchmarkKind, sweep: &SweepArgs) -> Result<()> {
    let config = SweepConfig::resolve(benchmark, sweep, &args.workdir)?;

    match sweep.mode {
        Mode::Run if sweep.dry_run => {
            drivers::sweep(&config, &mut DryRunLauncher)?;
        }
        Mode::Run => {
            let mut launcher = ShellLauncher::new(&args.workdir)?;
            drivers::sweep(&config, &mut launcher)?;
        }
        Mode::Plot => plot(args, &config, sweep)?,
    }
    Ok(())
}

fn plot(args: &CliArgs, config: &SweepConfig, sweep: &SweepArgs) -> Result<()> {
    let mut output = open_output(args.output_file.as_deref())?;
    ResultTable::print_csv_header(&mut output).context("Failed to write table header")?;

    let options = ChartOptions {
        log_scale: sweep.log_scale,
        legend: sweep.legend,
        speedup: sweep.speedup,
    };

    for &scaling in config.benchmark.scalings() {
        let table = ResultTable::collect(config, scaling)
            .with_context(|| format!("Failed to aggregate {scaling} scaling results"))?;
        write!(output, "{table}").context("Failed to write table")?;

        match config.benchmark {
            BenchmarkKind::Stencil => {
                let analysis = RadiusAnalysis::new(&table, config.size, consts::STENCIL_RADII)?;
                info!(ratios = ?analysis.ratios, "radius analysis");
                charts::draw_radius_chart(
                    &analysis,
                    config.benchmark.plot_prefix(),
                    sweep.legend,
                    &args.plot_dir,
                )?;
            }
            _ => {
                charts::draw_scaling_chart(&table, &config.versions, options, &args.plot_dir)?;
            }
        }
    }
    Ok(())
}

fn memory(args: &CliArgs, mem: &MemoryArgs) -> Result<()> {
    let table = FootprintTable::read(&mem.dump, &mem.benchmarks)?;
    charts::draw_memory_chart(&table, mem.raw, &args.plot_dir)?;
    Ok(())
}
