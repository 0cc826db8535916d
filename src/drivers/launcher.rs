//! Job launchers.

use super::{Job, Launcher};
use crate::{
    consts::{ERR_DIR, OUT_DIR, SCRIPTS_DIR},
    error::{Result, SweepError},
};

use tracing::{info, warn};

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// Launches jobs as child processes of the current process, from the benchmark directory.
pub struct ShellLauncher {
    workdir: PathBuf,
}

impl ShellLauncher {
    /// Creates the output, error and scripts directories under `workdir` if needed.
    pub fn new(workdir: &Path) -> Result<Self> {
        for dir in [OUT_DIR, ERR_DIR, SCRIPTS_DIR] {
            let path = workdir.join(dir);
            fs::create_dir_all(&path).map_err(|e| SweepError::io(path, e))?;
        }
        // Children run from `workdir`, relative program paths must not be resolved twice
        let workdir = fs::canonicalize(workdir).map_err(|e| SweepError::io(workdir, e))?;
        Ok(Self { workdir })
    }
}

impl Launcher for ShellLauncher {
    fn launch(&mut self, job: &Job) -> Result<()> {
        if let Some(ref wrapper) = job.wrapper {
            let path = self.workdir.join(&wrapper.path);
            fs::write(&path, &wrapper.contents).map_err(|e| SweepError::io(path, e))?;
        }

        let command = &job.command;
        info!("{command}");

        // Paths such as `./bin/foo` are relative to the benchmark directory, not to ours
        let program = match command.program.contains('/') {
            true => self.workdir.join(&command.program),
            false => PathBuf::from(&command.program),
        };
        let mut child = Command::new(program);
        child.args(&command.args).current_dir(&self.workdir);
        if let Some(ref stdout) = command.stdout {
            let path = self.workdir.join(stdout);
            let file = File::create(&path).map_err(|e| SweepError::io(path, e))?;
            child.stdout(Stdio::from(file));
        }

        let status = child.status().map_err(|source| SweepError::Launch {
            command: command.to_string(),
            source,
        })?;
        if !status.success() {
            warn!(%status, "`{command}` did not succeed");
        }
        Ok(())
    }
}

/// Only prints the jobs.
#[derive(Default)]
pub struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    fn launch(&mut self, job: &Job) -> Result<()> {
        if let Some(ref wrapper) = job.wrapper {
            info!("write {}", wrapper.path.display());
        }
        info!("{}", job.command);
        Ok(())
    }
}
