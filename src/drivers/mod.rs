//! Run drivers.
//!
//! This module provides the API for launching every run of a sweep. It acts as a layer
//! abstracting over the way runs are executed: either directly on the current machine, or
//! submitted to a SLURM batch queue.
//!
//! # High-level approach for a sweep
//! ## 1. Run identification
//! Each run is identified by its version, its number of locales, its problem size and its trial
//! index (see [`RunId`]). This identity is used to name the file capturing the run's output, which
//! is read back when plotting.
//!
//! ## 2. Job creation
//! A run becomes a [`Job`]: the command to execute and, for batch submissions, the wrapper script
//! to write beforehand (see [`direct`] and [`batch`]).
//!
//! ## 3. Launch
//! Jobs are handed over to a [`Launcher`]. Direct runs are awaited one after the other, batch
//! submissions return as soon as the job is queued: the runs are assumed to be complete by the
//! time the plotting phase is invoked.

pub mod batch;
pub mod direct;
mod launcher;

pub use launcher::{DryRunLauncher, ShellLauncher};

use crate::{
    catalog::Version,
    config::SweepConfig,
    consts::{CLEANUP_TARGET, ERR_DIR, OUT_DIR, SCRIPTS_DIR},
    error::Result,
};

use tracing::{info, warn};

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Identity of a single run.
#[derive(Clone, Copy, Debug)]
pub struct RunId<'a> {
    pub version: &'a Version,
    pub locales: u32,
    pub size: u64,
    /// Trial index, starting at 1.
    pub trial: u32,
}

impl RunId<'_> {
    /// Unique name of the run: `{executable}.{abbrev}.{locales}.{size}.try{trial}`.
    pub fn name(&self) -> String {
        format!(
            "{}.{}.{:02}.{}.try{}",
            self.version.exec_name, self.version.abbrev, self.locales, self.size, self.trial
        )
    }

    /// File capturing the standard output, relative to the working directory.
    pub fn output_path(&self) -> PathBuf {
        Path::new(OUT_DIR).join(format!("{}.out", self.name()))
    }

    /// File capturing the standard error of batch jobs, relative to the working directory.
    pub fn error_path(&self) -> PathBuf {
        Path::new(ERR_DIR).join(format!("{}.err", self.name()))
    }

    /// Batch wrapper script, relative to the working directory.
    pub fn wrapper_path(&self) -> PathBuf {
        Path::new(SCRIPTS_DIR).join(format!("__batch.{}", self.name()))
    }
}

/// External command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunCommand {
    pub program: String,
    pub args: Vec<String>,
    /// File the standard output is redirected to, relative to the working directory.
    pub stdout: Option<PathBuf>,
}

impl fmt::Display for RunCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(ref stdout) = self.stdout {
            write!(f, " > ./{}", stdout.display())?;
        }
        Ok(())
    }
}

/// Script written before submitting a batch job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wrapper {
    /// Relative to the working directory.
    pub path: PathBuf,
    pub contents: String,
}

/// Everything needed to launch one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub wrapper: Option<Wrapper>,
    pub command: RunCommand,
}

impl From<RunCommand> for Job {
    fn from(command: RunCommand) -> Self {
        Self {
            wrapper: None,
            command,
        }
    }
}

/// Executes jobs.
pub trait Launcher {
    fn launch(&mut self, job: &Job) -> Result<()>;
}

/// Recording launcher, jobs are only collected.
impl Launcher for Vec<Job> {
    fn launch(&mut self, job: &Job) -> Result<()> {
        self.push(job.clone());
        Ok(())
    }
}

/// Launches every run of the sweep: for each version, locale count and trial, the strong-scaling
/// run and then the weak-scaling run. Returns the number of launched runs.
pub fn sweep(config: &SweepConfig, launcher: &mut dyn Launcher) -> Result<usize> {
    let mut launched = 0;
    for version in &config.versions {
        for &locales in &config.locales {
            for trial in config.trials() {
                for &scaling in config.benchmark.scalings() {
                    let run = RunId {
                        version,
                        locales,
                        size: config.size_for(scaling, locales)?,
                        trial,
                    };
                    let job = match config.batch {
                        Some(ref settings) => batch::job(&run, settings),
                        None => direct::job(&run),
                    };
                    launcher.launch(&job)?;
                    launched += 1;
                }
            }
        }
    }
    info!(benchmark = %config.benchmark, launched, "sweep launched");

    if let Err(e) = launcher.launch(&cleanup_job()) {
        warn!("cleanup failed: {e}");
    }

    Ok(launched)
}

fn cleanup_job() -> Job {
    RunCommand {
        program: "make".to_string(),
        args: vec![CLEANUP_TARGET.to_string()],
        stdout: None,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::BenchmarkKind,
        cli::{Host, Mode, SweepArgs},
    };

    fn config(benchmark: BenchmarkKind, slurm: bool) -> SweepConfig {
        let args = SweepArgs {
            mode: Mode::Run,
            size: 1000,
            num_tries: 2,
            slurm,
            host: Host::George,
            square: false,
            mem_track: false,
            log_scale: false,
            legend: false,
            speedup: false,
            dry_run: false,
        };
        SweepConfig::resolve(benchmark, &args, Path::new("/tmp/bench")).unwrap()
    }

    #[test]
    fn run_names() {
        let config = config(BenchmarkKind::Dgemm, false);
        let run = RunId {
            version: &config.versions[1],
            locales: 4,
            size: 1000,
            trial: 3,
        };
        assert_eq!(run.name(), "dgemm_pref_cons.3cons.04.1000.try3");
        assert_eq!(
            run.output_path(),
            Path::new("out/dgemm_pref_cons.3cons.04.1000.try3.out")
        );
        assert_eq!(
            run.wrapper_path(),
            Path::new("scripts/__batch.dgemm_pref_cons.3cons.04.1000.try3")
        );
    }

    #[test]
    fn sweep_issues_strong_then_weak_runs() {
        let config = config(BenchmarkKind::Sparse, false);
        let mut jobs: Vec<Job> = Vec::new();
        let launched = sweep(&config, &mut jobs).unwrap();

        assert_eq!(launched, config.versions.len() * 3 * 2 * 2);
        assert_eq!(jobs.len(), launched + 1);
        assert_eq!(
            jobs[0].command.to_string(),
            "./bin/sparse_base -nl01 --order=1000 --iterations=2 > ./out/sparse_base.0.01.1000.try1.out"
        );
        assert_eq!(
            jobs[1].command.to_string(),
            "./bin/sparse_base -nl01 --order=500 --iterations=2 > ./out/sparse_base.0.01.500.try1.out"
        );
        assert_eq!(jobs.last().unwrap().command.to_string(), "make cleanslurm");
        assert!(jobs.iter().all(|j| j.wrapper.is_none()));
    }

    #[test]
    fn stencil_only_runs_strong_scaling() {
        let config = config(BenchmarkKind::Stencil, false);
        let mut jobs: Vec<Job> = Vec::new();
        let launched = sweep(&config, &mut jobs).unwrap();
        assert_eq!(launched, config.versions.len() * 2);
        assert!(jobs[..launched]
            .iter()
            .all(|j| j.command.args.contains(&"--order=1000".to_string())));
    }

    #[test]
    fn batch_sweep_writes_wrappers() {
        let config = config(BenchmarkKind::Dgemm, true);
        let mut jobs: Vec<Job> = Vec::new();
        sweep(&config, &mut jobs).unwrap();

        let first = &jobs[0];
        assert_eq!(first.command.program, "sbatch");
        assert!(first.command.args.contains(&"--partition=hpcl".to_string()));
        let wrapper = first.wrapper.as_ref().unwrap();
        assert_eq!(
            wrapper.contents,
            "#!/bin/sh\n./bin/dgemm_base -nl01 --order=1000 --iterations=2 --blockSize=4\n"
        );
    }
}
