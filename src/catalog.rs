//! Benchmark and version catalog.
//!
//! Every benchmark is compiled in several variants (baseline, hand-optimized, consistent and
//! inconsistent prefetching, with or without a static domain). A [`Version`] describes one such
//! variant: which executable to launch, with which flags, and how to draw it.

use crate::consts::STENCIL_RADII;

use plotters::style::RGBColor;

use std::fmt;

/// List of benchmarks that can be swept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchmarkKind {
    Dgemm,
    Sparse,
    Stencil,
    Transpose,
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dgemm => write!(f, "DGEMM"),
            Self::Sparse => write!(f, "Sparse"),
            Self::Stencil => write!(f, "Stencil"),
            Self::Transpose => write!(f, "Transpose"),
        }
    }
}

/// How the amount of work of a benchmark grows with its problem size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalingLaw {
    /// O(n^2) work.
    Area,
    /// O(n^3) work.
    Volume,
}

impl ScalingLaw {
    pub fn exponent(self) -> u32 {
        match self {
            Self::Area => 2,
            Self::Volume => 3,
        }
    }
}

/// Scaling experiment a run belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scaling {
    Strong,
    Weak,
}

impl Scaling {
    /// Suffix appended to chart names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Strong => "_ss",
            Self::Weak => "_ws",
        }
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Weak => write!(f, "weak"),
        }
    }
}

impl BenchmarkKind {
    /// Prefix of the charts produced for this benchmark.
    pub fn plot_prefix(self) -> &'static str {
        match self {
            Self::Dgemm => "dgemm",
            Self::Sparse => "prk_sparse",
            Self::Stencil => "radius_analysis",
            Self::Transpose => "prk_transpose",
        }
    }

    pub fn scaling_law(self) -> ScalingLaw {
        match self {
            Self::Dgemm => ScalingLaw::Volume,
            Self::Sparse | Self::Stencil | Self::Transpose => ScalingLaw::Area,
        }
    }

    /// Whether weak-scaling sizes are rounded up to a multiple of the tile size.
    pub fn tiled(self) -> bool {
        matches!(self, Self::Transpose)
    }

    /// Scaling experiments swept for this benchmark.
    pub fn scalings(self) -> &'static [Scaling] {
        match self {
            Self::Stencil => &[Scaling::Strong],
            _ => &[Scaling::Strong, Scaling::Weak],
        }
    }

    /// Builds the list of versions to compare. The first version is the baseline.
    #[rustfmt::skip]
    pub fn versions(self, batch: bool, mem_track: bool) -> Vec<Version> {
        let mut common = match (self, batch) {
            (Self::Dgemm, _) => "--iterations=2 --blockSize=4".to_string(),
            (Self::Sparse, false) => "--iterations=2".to_string(),
            (Self::Sparse, true) | (Self::Stencil, _) => "--iterations=10".to_string(),
            (Self::Transpose, false) => "--iterations=2 --tileSize=4".to_string(),
            (Self::Transpose, true) => "--iterations=10 --tileSize=8".to_string(),
        };
        if mem_track {
            common.push_str(" --memTrack");
        }
        let static_domain = format!("{common} --staticDomain");

        match self {
            Self::Dgemm => vec![
                Version::new("dgemm_base", "0", &common, BLUE, Marker::Circle, LineStyle::Solid),
                Version::new("dgemm_pref_cons", "3cons", &common, RED, Marker::Triangle, LineStyle::Solid),
                Version::new("dgemm_pref_incons", "3incons", &common, CYAN, Marker::Octagon, LineStyle::Solid),
                Version::new("dgemm_pref_cons_u", "3cons_u", &common, MAGENTA, Marker::Square, LineStyle::Solid),
                Version::new("dgemm_pref_incons", "3incons_u", &common, YELLOW, Marker::Cross, LineStyle::Solid),
            ],
            Self::Sparse => vec![
                Version::new("sparse_base", "0", &common, BLUE, Marker::Circle, LineStyle::Solid),
                Version::new("sparse_pref_cons", "3cons", &common, RED, Marker::Triangle, LineStyle::Solid),
                Version::new("sparse_pref_incons", "3incons", &common, CYAN, Marker::Octagon, LineStyle::Solid),
                Version::new("sparse_pref_cons_u", "3cons_u", &common, MAGENTA, Marker::Square, LineStyle::Solid),
                Version::new("sparse_pref_incons", "3incons_u", &common, YELLOW, Marker::Cross, LineStyle::Solid),
                Version::new("sparse_pref_cons", "3cons_sd", &common, RED, Marker::Triangle, LineStyle::Dashed),
                Version::new("sparse_pref_incons", "3incons_sd", &common, CYAN, Marker::Octagon, LineStyle::Dashed),
                Version::new("sparse_pref_cons_u", "3cons_u_sd", &common, MAGENTA, Marker::Square, LineStyle::Dashed),
                Version::new("sparse_pref_incons", "3incons_u_sd", &common, YELLOW, Marker::Cross, LineStyle::Dashed),
            ],
            Self::Stencil => {
                let prefetch = format!("{common} --prefetch --staticDomain");
                let mut versions = Vec::with_capacity(3 * STENCIL_RADII.len());
                for r in STENCIL_RADII {
                    versions.push(radius_version(*r, "nopref", format!("{common} --R={r}")));
                }
                for r in STENCIL_RADII {
                    versions.push(radius_version(*r, "pref", format!("{prefetch} --R={r}")));
                }
                for r in STENCIL_RADII {
                    versions.push(radius_version(
                        *r,
                        "pref_incons",
                        format!("{prefetch} --R={r} --consistent=false"),
                    ));
                }
                versions
            }
            Self::Transpose => vec![
                Version::new("transpose_base", "0", &common, BASE_RED, Marker::Circle, LineStyle::Solid),
                Version::new("transpose_handopt", "2", &common, SALMON, Marker::Cross, LineStyle::Solid),
                Version::new("transpose_pref_cons", "3cons", &common, SKY, Marker::Square, LineStyle::Dashed),
                Version::new("transpose_pref_incons", "3incons", &common, NAVY, Marker::Cross, LineStyle::Dashed),
                Version::new("transpose_pref_cons", "3cons_sd", &static_domain, SKY, Marker::Square, LineStyle::Dotted),
                Version::new("transpose_pref_incons", "3incons_sd", &static_domain, NAVY, Marker::Cross, LineStyle::Dotted),
            ],
        }
    }
}

/// Abbreviation of the Stencil version for radius `r` and prefetching `mode`.
pub fn radius_abbrev(r: u32, mode: &str) -> String {
    format!("R{r:02}{mode}")
}

fn radius_version(r: u32, mode: &str, flags: String) -> Version {
    Version {
        exec_name: "radius_analysis".to_string(),
        abbrev: radius_abbrev(r, mode),
        flags,
        color: BLUE,
        marker: Marker::Circle,
        line_style: LineStyle::Solid,
    }
}

// Matplotlib single-letter colors.
pub const BLUE: RGBColor = RGBColor(0, 0, 255);
pub const RED: RGBColor = RGBColor(255, 0, 0);
pub const CYAN: RGBColor = RGBColor(0, 191, 191);
pub const MAGENTA: RGBColor = RGBColor(191, 0, 191);
pub const YELLOW: RGBColor = RGBColor(191, 191, 0);

// Diverging palette used for the Transpose and memory footprint charts.
pub const BASE_RED: RGBColor = RGBColor(0xca, 0x00, 0x20);
pub const SALMON: RGBColor = RGBColor(0xf4, 0xa5, 0x82);
pub const SKY: RGBColor = RGBColor(0x92, 0xc5, 0xde);
pub const NAVY: RGBColor = RGBColor(0x05, 0x71, 0xb0);

/// Marker drawn at every data point of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Triangle,
    Octagon,
    Square,
    Cross,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Descriptor of a benchmark variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Version {
    /// Name of the executable under the `bin` directory.
    pub exec_name: String,
    /// Short label, unique within a catalog.
    pub abbrev: String,
    /// Flags passed to the executable.
    pub flags: String,
    pub color: RGBColor,
    pub marker: Marker,
    pub line_style: LineStyle,
}

impl Version {
    pub fn new(
        exec_name: &str,
        abbrev: &str,
        flags: &str,
        color: RGBColor,
        marker: Marker,
        line_style: LineStyle,
    ) -> Self {
        Self {
            exec_name: exec_name.to_string(),
            abbrev: abbrev.to_string(),
            flags: flags.to_string(),
            color,
            marker,
            line_style,
        }
    }
}

/// Variant compared in the memory footprint chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintVersion {
    pub label: &'static str,
    pub color: RGBColor,
    /// Static-domain variants are drawn lighter than their dynamic counterparts.
    pub static_domain: bool,
}

/// Versions of the memory footprint dump, in dump order. The first one is the baseline.
#[rustfmt::skip]
pub const FOOTPRINT_VERSIONS: &[FootprintVersion] = &[
    FootprintVersion { label: "Base", color: BASE_RED, static_domain: false },
    FootprintVersion { label: "HandOpt", color: SALMON, static_domain: false },
    FootprintVersion { label: "AC", color: SKY, static_domain: false },
    FootprintVersion { label: "AC-SD", color: SKY, static_domain: true },
    FootprintVersion { label: "MC", color: NAVY, static_domain: false },
    FootprintVersion { label: "MC-SD", color: NAVY, static_domain: true },
];

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    const ALL: [BenchmarkKind; 4] = [
        BenchmarkKind::Dgemm,
        BenchmarkKind::Sparse,
        BenchmarkKind::Stencil,
        BenchmarkKind::Transpose,
    ];

    #[test]
    fn abbreviations_are_unique() {
        for bench in ALL {
            let versions = bench.versions(false, false);
            let abbrevs: HashSet<_> = versions.iter().map(|v| v.abbrev.as_str()).collect();
            assert_eq!(abbrevs.len(), versions.len(), "{bench}");
        }
    }

    #[test]
    fn batch_mode_uses_longer_runs() {
        let local = BenchmarkKind::Transpose.versions(false, false);
        let batch = BenchmarkKind::Transpose.versions(true, false);
        assert_eq!(local[0].flags, "--iterations=2 --tileSize=4");
        assert_eq!(batch[0].flags, "--iterations=10 --tileSize=8");
        assert_eq!(batch[4].flags, "--iterations=10 --tileSize=8 --staticDomain");
    }

    #[test]
    fn memory_tracking_flag_is_appended() {
        for version in BenchmarkKind::Sparse.versions(true, true) {
            assert!(version.flags.ends_with("--memTrack"), "{}", version.flags);
        }
    }

    #[test]
    fn stencil_versions_cover_every_radius() {
        let versions = BenchmarkKind::Stencil.versions(false, false);
        assert_eq!(versions.len(), 3 * STENCIL_RADII.len());
        assert_eq!(versions[0].abbrev, "R01nopref");
        assert_eq!(versions[0].flags, "--iterations=10 --R=1");
        let last = versions.last().unwrap();
        assert_eq!(last.abbrev, "R500pref_incons");
        assert_eq!(
            last.flags,
            "--iterations=10 --prefetch --staticDomain --R=500 --consistent=false"
        );
    }

    #[test]
    fn only_dgemm_scales_by_volume() {
        assert_eq!(BenchmarkKind::Dgemm.scaling_law().exponent(), 3);
        assert_eq!(BenchmarkKind::Sparse.scaling_law().exponent(), 2);
        assert_eq!(BenchmarkKind::Stencil.scalings(), &[Scaling::Strong]);
    }
}
