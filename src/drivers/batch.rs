//! Batch run driver.
//!
//! Submits the run to a SLURM queue: the direct command is written to a wrapper script, which is
//! then submitted with `sbatch` on as many nodes as there are locales. SLURM captures the standard
//! output and error in the run's output and error files.

use super::{direct, Job, RunCommand, RunId, Wrapper};
use crate::{config::BatchSettings, consts::SBATCH};

/// Job submitting `run` to the batch queue.
pub fn job(run: &RunId, settings: &BatchSettings) -> Job {
    let name = run.name();
    let wrapper = Wrapper {
        path: run.wrapper_path(),
        contents: format!("#!/bin/sh\n{}\n", direct::command(run)),
    };

    let command = RunCommand {
        program: SBATCH.to_string(),
        args: vec![
            format!("-N{:02}", run.locales),
            format!("--output=./{}", run.output_path().display()),
            format!("--error=./{}", run.error_path().display()),
            format!("--partition={}", settings.partition),
            format!("--job-name={name}"),
            format!("./{}", wrapper.path.display()),
        ],
        stdout: None,
    };

    Job {
        wrapper: Some(wrapper),
        command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BenchmarkKind;

    #[test]
    fn batch_job_submits_wrapper() {
        let versions = BenchmarkKind::Sparse.versions(true, false);
        let run = RunId {
            version: &versions[0],
            locales: 16,
            size: 2000,
            trial: 5,
        };
        let settings = BatchSettings {
            partition: "all".to_string(),
        };
        let job = job(&run, &settings);

        assert_eq!(
            job.command.to_string(),
            "sbatch -N16 --output=./out/sparse_base.0.16.2000.try5.out \
             --error=./err/sparse_base.0.16.2000.try5.err --partition=all \
             --job-name=sparse_base.0.16.2000.try5 ./scripts/__batch.sparse_base.0.16.2000.try5"
        );
        let wrapper = job.wrapper.unwrap();
        assert_eq!(
            wrapper.contents,
            "#!/bin/sh\n./bin/sparse_base -nl16 --order=2000 --iterations=10\n"
        );
        assert_eq!(wrapper.path, run.wrapper_path());
    }
}
