//! Sweep configuration.
//!
//! Resolves the command-line arguments of a benchmark subcommand into everything the run driver
//! and the post-processing need: the locale counts, the versions to compare and the problem size
//! to use for each locale count when weak scaling.
//!
//! # Weak-scaling sizes
//! The size `S` given on the command line is the size used at the largest locale count `L0`. For
//! a locale count `L`, the weak-scaling size `s` keeps the work per locale constant, i.e. for a
//! benchmark doing `O(n^k)` work, `s^k = S^k * L / L0`. The root is computed exactly on integers,
//! so `s` is the largest size such that `s^k <= S^k * L / L0`.

use crate::{
    catalog::{BenchmarkKind, Scaling, ScalingLaw, Version},
    cli::SweepArgs,
    consts,
    error::{Result, SweepError},
};

use num::integer::Roots;

use std::{
    collections::BTreeMap,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

/// Batch queue submission settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSettings {
    pub partition: String,
}

/// Fully resolved configuration of a sweep.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub benchmark: BenchmarkKind,
    /// Strong-scaling problem size.
    pub size: u64,
    pub tries: u32,
    /// Locale counts, in increasing order.
    pub locales: Vec<u32>,
    /// Weak-scaling problem size per locale count.
    pub ws_sizes: BTreeMap<u32, u64>,
    pub versions: Vec<Version>,
    /// `None` when running directly.
    pub batch: Option<BatchSettings>,
    /// Directory the benchmarks are run from.
    pub workdir: PathBuf,
    pub result_label: String,
}

impl SweepConfig {
    pub fn resolve(benchmark: BenchmarkKind, args: &SweepArgs, workdir: &Path) -> Result<Self> {
        if args.size == 0 {
            return Err(SweepError::Config("problem size must be positive".into()));
        }
        if args.num_tries == 0 {
            return Err(SweepError::Config("at least one trial is needed".into()));
        }

        let locales = locale_list(benchmark, args.slurm, args.square).to_vec();
        let tile = match (benchmark.tiled(), args.slurm) {
            (false, _) => None,
            (true, false) => Some(consts::LOCAL_TILE_SIZE),
            (true, true) => Some(consts::BATCH_TILE_SIZE),
        };
        let ws_sizes = weak_scaling_table(args.size, &locales, benchmark.scaling_law(), tile)?;

        Ok(Self {
            benchmark,
            size: args.size,
            tries: args.num_tries,
            locales,
            ws_sizes,
            versions: benchmark.versions(args.slurm, args.mem_track),
            batch: args.slurm.then(|| BatchSettings {
                partition: args.host.partition().to_string(),
            }),
            workdir: workdir.to_path_buf(),
            result_label: consts::RESULT_LABEL.to_string(),
        })
    }

    /// Problem size of the runs of `scaling` on `locales` locales.
    pub fn size_for(&self, scaling: Scaling, locales: u32) -> Result<u64> {
        match scaling {
            Scaling::Strong => Ok(self.size),
            Scaling::Weak => self.ws_sizes.get(&locales).copied().ok_or_else(|| {
                SweepError::Config(format!("no weak-scaling size for {locales} locales"))
            }),
        }
    }

    /// Trial indices, starting at 1.
    pub fn trials(&self) -> RangeInclusive<u32> {
        1..=self.tries
    }
}

/// Locale counts swept for `benchmark`.
pub fn locale_list(benchmark: BenchmarkKind, batch: bool, square: bool) -> &'static [u32] {
    match (benchmark, batch, square) {
        (BenchmarkKind::Stencil, _, _) => consts::STENCIL_LOCALES,
        (_, false, false) => consts::LOCAL_LOCALES,
        (_, false, true) => consts::LOCAL_SQUARE_LOCALES,
        (_, true, false) => consts::BATCH_LOCALES,
        (_, true, true) => consts::BATCH_SQUARE_LOCALES,
    }
}

/// Size keeping the work per locale of a `base_size` problem on `base_locales` locales constant
/// on `locales` locales.
pub fn weak_scaling_size(
    base_size: u64,
    locales: u32,
    base_locales: u32,
    law: ScalingLaw,
) -> Result<u64> {
    if base_locales == 0 || locales == 0 {
        return Err(SweepError::Config("locale counts must be positive".into()));
    }
    let k = law.exponent();
    let work = u128::from(base_size)
        .checked_pow(k)
        .and_then(|w| w.checked_mul(u128::from(locales)))
        .ok_or_else(|| SweepError::Config(format!("size {base_size} overflows")))?;
    let size = (work / u128::from(base_locales)).nth_root(k);

    u64::try_from(size).map_err(|_| SweepError::Config(format!("size {size} overflows")))
}

/// Rounds `size` up to the next multiple of `locales * tile` strictly above it, so that every
/// locale holds a whole number of tiles.
pub fn round_to_tile(size: u64, locales: u32, tile: u64) -> u64 {
    let base = u64::from(locales) * tile;
    base * (size / base + 1)
}

/// Builds the weak-scaling size table of `locales`, with the largest locale count as baseline.
pub fn weak_scaling_table(
    size: u64,
    locales: &[u32],
    law: ScalingLaw,
    tile: Option<u64>,
) -> Result<BTreeMap<u32, u64>> {
    let base_locales = locales
        .iter()
        .copied()
        .max()
        .ok_or_else(|| SweepError::Config("empty locale list".into()))?;

    locales
        .iter()
        .map(|&l| {
            let exact = weak_scaling_size(size, l, base_locales, law)?;
            let size = match tile {
                Some(tile) => round_to_tile(exact, l, tile),
                None => exact,
            };
            Ok((l, size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Host, Mode};

    fn args(size: u64, slurm: bool, square: bool) -> SweepArgs {
        SweepArgs {
            mode: Mode::Run,
            size,
            num_tries: 3,
            slurm,
            host: Host::Pyramid,
            square,
            mem_track: false,
            log_scale: false,
            legend: false,
            speedup: false,
            dry_run: false,
        }
    }

    #[test]
    fn weak_scaling_size_bounds_the_work() {
        for law in [ScalingLaw::Area, ScalingLaw::Volume] {
            let k = law.exponent();
            for size in [1_u64, 7, 100, 1000, 4096, 12345] {
                for &l in consts::BATCH_LOCALES {
                    let derived = weak_scaling_size(size, l, 32, law).unwrap();
                    let target = u128::from(size).pow(k) * u128::from(l) / 32;
                    assert!(u128::from(derived).pow(k) <= target);
                    assert!(u128::from(derived + 1).pow(k) > target);
                }
            }
        }
    }

    #[test]
    fn weak_scaling_size_is_identity_at_baseline() {
        assert_eq!(weak_scaling_size(1000, 4, 4, ScalingLaw::Area).unwrap(), 1000);
        assert_eq!(weak_scaling_size(1000, 4, 4, ScalingLaw::Volume).unwrap(), 1000);
    }

    #[test]
    fn weak_scaling_size_known_values() {
        // sqrt(1000^2 / 4) and cbrt(1000^3 / 8)
        assert_eq!(weak_scaling_size(1000, 1, 4, ScalingLaw::Area).unwrap(), 500);
        assert_eq!(weak_scaling_size(1000, 1, 8, ScalingLaw::Volume).unwrap(), 500);
        // floor(sqrt(500000)) = 707
        assert_eq!(weak_scaling_size(1000, 1, 2, ScalingLaw::Area).unwrap(), 707);
    }

    #[test]
    fn weak_scaling_size_rejects_zero_locales() {
        assert!(weak_scaling_size(1000, 1, 0, ScalingLaw::Area).is_err());
    }

    #[test]
    fn tile_rounding_goes_strictly_above() {
        assert_eq!(round_to_tile(500, 1, 4), 504);
        assert_eq!(round_to_tile(501, 1, 4), 504);
        assert_eq!(round_to_tile(707, 2, 4), 712);
        for size in 1..200 {
            for l in [1, 2, 4] {
                let rounded = round_to_tile(size, l, 8);
                assert_eq!(rounded % (u64::from(l) * 8), 0);
                assert!(rounded > size && rounded <= size + u64::from(l) * 8);
            }
        }
    }

    #[test]
    fn resolve_local_transpose() {
        let config =
            SweepConfig::resolve(BenchmarkKind::Transpose, &args(1000, false, false), Path::new("."))
                .unwrap();
        assert_eq!(config.locales, vec![1, 2, 4]);
        assert!(config.batch.is_none());
        // exact sizes 500, 707, 1000 rounded to multiples of 4, 8, 16
        assert_eq!(config.size_for(Scaling::Weak, 1).unwrap(), 504);
        assert_eq!(config.size_for(Scaling::Weak, 2).unwrap(), 712);
        assert_eq!(config.size_for(Scaling::Weak, 4).unwrap(), 1008);
        assert_eq!(config.size_for(Scaling::Strong, 2).unwrap(), 1000);
        assert_eq!(config.trials().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn resolve_batch_square_layout() {
        let config =
            SweepConfig::resolve(BenchmarkKind::Sparse, &args(500, true, true), Path::new("."))
                .unwrap();
        assert_eq!(config.locales, vec![1, 4, 9, 16, 25]);
        assert_eq!(config.batch.unwrap().partition, "all");
        assert_eq!(config.ws_sizes[&25], 500);
        assert_eq!(config.ws_sizes[&1], 100);
    }

    #[test]
    fn resolve_rejects_zero_size() {
        assert!(
            SweepConfig::resolve(BenchmarkKind::Dgemm, &args(0, false, false), Path::new("."))
                .is_err()
        );
    }

    #[test]
    fn stencil_always_uses_two_locales() {
        assert_eq!(locale_list(BenchmarkKind::Stencil, true, true), &[2]);
    }
}
