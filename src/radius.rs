//! Stencil radius analysis.
//!
//! For each stencil radius, compares the result without prefetching to the result with
//! consistent and inconsistent prefetching. The analytic ratio of each radius is drawn alongside
//! on a secondary axis.

use crate::{
    catalog::radius_abbrev,
    error::{Result, SweepError},
    perf_report::ResultTable,
};

/// Analytic ratio for a domain of order `size` and a stencil of radius `radius`.
pub fn analytic_ratio(size: u64, radius: u32) -> f64 {
    let s = size as f64;
    let r = f64::from(radius);
    (s - 2.0 * r) * ((6.0 * r - s + 2.0) / 8.0) / ((4.0 * s * r + s - 8.0 * r * r - 2.0 * r) / 2.0)
}

/// Improvements brought by prefetching, per radius.
#[derive(Clone, Debug, PartialEq)]
pub struct RadiusAnalysis {
    pub radii: Vec<u32>,
    /// `nopref / pref` on the first locale count.
    pub improvement: Vec<f64>,
    /// `nopref / pref_incons` on the first locale count.
    pub improvement_incons: Vec<f64>,
    pub ratios: Vec<f64>,
}

impl RadiusAnalysis {
    pub fn new(table: &ResultTable, size: u64, radii: &[u32]) -> Result<Self> {
        let first_mean = |abbrev: String| -> Result<f64> {
            table
                .series(&abbrev)?
                .stats
                .first()
                .map(|s| s.mean)
                .ok_or(SweepError::UnknownVersion(abbrev))
        };

        let mut improvement = Vec::with_capacity(radii.len());
        let mut improvement_incons = Vec::with_capacity(radii.len());
        for &r in radii {
            let nopref = first_mean(radius_abbrev(r, "nopref"))?;
            improvement.push(nopref / first_mean(radius_abbrev(r, "pref"))?);
            improvement_incons.push(nopref / first_mean(radius_abbrev(r, "pref_incons"))?);
        }

        Ok(Self {
            radii: radii.to_vec(),
            improvement,
            improvement_incons,
            ratios: radii.iter().map(|&r| analytic_ratio(size, r)).collect(),
        })
    }
}
