//! Direct run driver.
//!
//! Runs the benchmark executable on the current machine, its standard output captured in the
//! run's output file.

use super::{Job, RunCommand, RunId};
use crate::consts::BIN_DIR;

/// Command running `run` directly, without output redirection.
pub fn command(run: &RunId) -> RunCommand {
    let mut args = vec![
        format!("-nl{:02}", run.locales),
        format!("--order={}", run.size),
    ];
    args.extend(run.version.flags.split_whitespace().map(String::from));

    RunCommand {
        program: format!("./{BIN_DIR}/{}", run.version.exec_name),
        args,
        stdout: None,
    }
}

/// Job running `run` directly.
pub fn job(run: &RunId) -> Job {
    RunCommand {
        stdout: Some(run.output_path()),
        ..command(run)
    }
    .into()
}
