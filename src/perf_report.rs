//! Performance report related structures and functions.
//!
//! This module defines all the necessary data structures and functions needed to aggregate the
//! values extracted from the runs of a sweep: for each version and each locale count, the trials
//! are reduced to their mean and (population) standard deviation.

use crate::{
    catalog::{BenchmarkKind, Scaling},
    config::SweepConfig,
    drivers::RunId,
    error::{Result, SweepError},
    extract::extract_value,
};

use rayon::prelude::*;
use statistical::{mean, population_standard_deviation};
use tracing::info;

use std::{fmt, io::Write};

/// Statistics of the trials of one configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub trials: usize,
}

impl Stats {
    /// Reduces the values of the trials, `None` if there are none.
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let avg = mean(values);
        let stddev = match values.len() {
            1 => 0.0,
            _ => population_standard_deviation(values, Some(avg)),
        };

        Some(Self {
            mean: avg,
            stddev,
            trials: values.len(),
        })
    }
}

/// Statistics of one version, one entry per locale count.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub abbrev: String,
    pub stats: Vec<Stats>,
}

impl Series {
    pub fn means(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.mean).collect()
    }
}

/// Aggregated results of one scaling experiment.
///
/// Versions are kept in catalog order and statistics in locale-list order, so that rendering a
/// table twice from the same files gives the same bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultTable {
    pub benchmark: BenchmarkKind,
    pub scaling: Scaling,
    pub locales: Vec<u32>,
    /// Problem size for each locale count.
    pub sizes: Vec<u64>,
    pub series: Vec<Series>,
}

impl ResultTable {
    pub fn print_csv_header(output: &mut dyn Write) -> std::io::Result<()> {
        writeln!(output, "scaling,version,locales,size,trials,mean,stddev")
    }

    /// Extracts the values of every run of `scaling` and aggregates them.
    ///
    /// Fails on the first missing or malformed output file.
    pub fn collect(config: &SweepConfig, scaling: Scaling) -> Result<Self> {
        let sizes = config
            .locales
            .iter()
            .map(|&l| config.size_for(scaling, l))
            .collect::<Result<Vec<_>>>()?;

        let mut series = Vec::with_capacity(config.versions.len());
        for version in &config.versions {
            let mut stats = Vec::with_capacity(config.locales.len());
            for (&locales, &size) in config.locales.iter().zip(&sizes) {
                let values = config
                    .trials()
                    .into_par_iter()
                    .map(|trial| {
                        let run = RunId {
                            version,
                            locales,
                            size,
                            trial,
                        };
                        extract_value(
                            &config.workdir.join(run.output_path()),
                            &config.result_label,
                        )
                    })
                    .collect::<Result<Vec<f64>>>()?;

                stats.extend(Stats::new(&values));
            }
            series.push(Series {
                abbrev: version.abbrev.clone(),
                stats,
            });
        }
        info!(benchmark = %config.benchmark, %scaling, "aggregated results");

        Ok(Self {
            benchmark: config.benchmark,
            scaling,
            locales: config.locales.clone(),
            sizes,
            series,
        })
    }

    pub fn series(&self, abbrev: &str) -> Result<&Series> {
        self.series
            .iter()
            .find(|s| s.abbrev == abbrev)
            .ok_or_else(|| SweepError::UnknownVersion(abbrev.to_string()))
    }

    /// Speedup of version `abbrev` over version `base` for each locale count. Values are rates,
    /// so the speedup is the ratio of the version's mean to the base's mean.
    pub fn speedups(&self, abbrev: &str, base: &str) -> Result<Vec<f64>> {
        let base = self.series(base)?;
        let series = self.series(abbrev)?;
        Ok(base
            .stats
            .iter()
            .zip(&series.stats)
            .map(|(b, s)| s.mean / b.mean)
            .collect())
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for series in &self.series {
            for ((locales, size), stats) in self.locales.iter().zip(&self.sizes).zip(&series.stats)
            {
                writeln!(
                    f,
                    "{},{},{},{},{},{},{}",
                    self.scaling,
                    series.abbrev,
                    locales,
                    size,
                    stats.trials,
                    stats.mean,
                    stats.stddev,
                )?;
            }
        }
        Ok(())
    }
}
