//! Chart rendering.
//!
//! Charts are drawn with [`plotters`][1] as SVG files:
//! - scaling charts: one line per version against the number of locales, either raw values or
//!   speedups over the base version;
//! - the Stencil radius chart: prefetching improvements against the stencil radius, with the
//!   analytic ratio on a secondary axis;
//! - the memory footprint chart: grouped bars, one group per benchmark.
//!
//! [1]: https://crates.io/crates/plotters

use crate::{
    catalog::{LineStyle, Marker, Scaling, Version, FOOTPRINT_VERSIONS},
    consts::CHART_SIZE,
    error::SweepError,
    memory::FootprintTable,
    perf_report::ResultTable,
    radius::RadiusAnalysis,
};

use anyhow::{Context, Result};
use plotters::{
    coord::{
        ranged1d::{Ranged, ValueFormatter},
        types::RangedCoordf64,
    },
    prelude::*,
    series::DashedLineSeries,
};
use tracing::info;

use std::{
    fs,
    path::{Path, PathBuf},
};

const CAPTION_FONT_SIZE: u32 = 32;
const LABEL_FONT_SIZE: u32 = 20;
const LINE_WIDTH: u32 = 2;

/// Display options of the scaling charts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartOptions {
    pub log_scale: bool,
    pub legend: bool,
    /// Plot speedups over the base version instead of raw values.
    pub speedup: bool,
}

/// One line of a scaling chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Line<'v> {
    pub version: &'v Version,
    pub points: Vec<(f64, f64)>,
}

/// Builds the lines of a scaling chart, in catalog order. The first version is the base.
pub fn scaling_lines<'v>(
    table: &ResultTable,
    versions: &'v [Version],
    speedup: bool,
) -> std::result::Result<Vec<Line<'v>>, SweepError> {
    let Some(base) = versions.first() else {
        return Ok(Vec::new());
    };

    versions
        .iter()
        .map(|version| {
            let values = match speedup {
                true => table.speedups(&version.abbrev, &base.abbrev)?,
                false => table.series(&version.abbrev)?.means(),
            };
            let points = table
                .locales
                .iter()
                .map(|&l| f64::from(l))
                .zip(values)
                .collect();
            Ok(Line { version, points })
        })
        .collect()
}

/// File name of a scaling chart, e.g. `prk_transpose_ws_speedup.svg`.
pub fn scaling_chart_name(prefix: &str, scaling: Scaling, speedup: bool) -> String {
    let variant = if speedup { "_speedup" } else { "" };
    format!("{prefix}{}{variant}.svg", scaling.suffix())
}

fn benchmark_dir(plot_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let dir = plot_dir.join(prefix);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Draws the scaling chart of `table` under `plot_dir/{prefix}/`.
pub fn draw_scaling_chart(
    table: &ResultTable,
    versions: &[Version],
    options: ChartOptions,
    plot_dir: &Path,
) -> Result<PathBuf> {
    let mut lines = scaling_lines(table, versions, options.speedup)?;
    if options.log_scale {
        for line in &mut lines {
            line.points.retain(|&(_, y)| y > 0.0);
        }
    }

    let prefix = table.benchmark.plot_prefix();
    let path = benchmark_dir(plot_dir, prefix)?.join(scaling_chart_name(
        prefix,
        table.scaling,
        options.speedup,
    ));

    let svg_path = path.clone();
    let root = SVGBackend::new(&svg_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let max_locale = table.locales.iter().copied().max().unwrap_or(1);
    let x_range = 0.0..(f64::from(max_locale) * 1.1 + 1.0);
    let ys = || lines.iter().flat_map(|l| l.points.iter().map(|p| p.1));
    let max_y = ys().fold(0.0, f64::max);
    let max_y = if max_y > 0.0 { max_y } else { 1.0 };
    let y_desc = match options.speedup {
        true => "Speedup over base",
        false => "Throughput (MFlops/s)",
    };

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(
            format!("{} {} scaling", table.benchmark, table.scaling),
            ("sans-serif", CAPTION_FONT_SIZE),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80);

    if options.log_scale {
        let min_y = ys().filter(|&y| y > 0.0).fold(max_y, f64::min);
        let mut chart =
            builder.build_cartesian_2d(x_range, (min_y / 2.0..max_y * 2.0).log_scale())?;
        draw_lines(&mut chart, &lines, &table.locales, y_desc, options.legend)?;
    } else {
        let mut chart = builder.build_cartesian_2d(x_range, 0.0..max_y * 1.1)?;
        draw_lines(&mut chart, &lines, &table.locales, y_desc, options.legend)?;
    }

    root.present()?;
    info!("Plot saved: {}", path.display());
    Ok(path)
}

fn draw_lines<'a, DB, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    lines: &[Line<'_>],
    locales: &[u32],
    y_desc: &str,
    legend: bool,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let max_locale = locales.iter().copied().max().unwrap_or(1);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_labels(max_locale as usize + 1)
        .x_label_formatter(&|x| {
            let rounded = x.round();
            match (x - rounded).abs() < 1e-6 && locales.contains(&(rounded as u32)) {
                true => format!("{rounded:.0}"),
                false => String::new(),
            }
        })
        .x_desc("Number of Locales")
        .y_desc(y_desc)
        .label_style(("sans-serif", LABEL_FONT_SIZE))
        .draw()?;

    for line in lines {
        let color = line.version.color;
        let style = color.stroke_width(LINE_WIDTH);
        let points = line.points.clone();
        let anno = match line.version.line_style {
            LineStyle::Solid => chart.draw_series(LineSeries::new(points, style))?,
            LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(points, 10, 6, style))?,
            LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 4, style))?,
        };
        if legend {
            anno.label(line.version.abbrev.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
            });
        }
        draw_markers(chart, &line.points, line.version.marker, color)?;
    }

    if legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LABEL_FONT_SIZE))
            .draw()?;
    }
    Ok(())
}

fn draw_markers<'a, DB, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
{
    let filled = color.filled();
    let stroke = color.stroke_width(LINE_WIDTH);
    let points = points.iter().copied();
    match marker {
        Marker::Circle => {
            chart.draw_series(points.map(|p| Circle::new(p, 5, filled)))?;
        }
        Marker::Octagon => {
            chart.draw_series(points.map(|p| Circle::new(p, 7, stroke)))?;
        }
        Marker::Triangle => {
            chart.draw_series(points.map(|p| TriangleMarker::new(p, 6, filled)))?;
        }
        Marker::Square => {
            chart.draw_series(
                points.map(|p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)),
            )?;
        }
        Marker::Cross => {
            chart.draw_series(points.map(|p| Cross::new(p, 5, stroke)))?;
        }
    }
    Ok(())
}

/// Draws the Stencil radius chart under `plot_dir/{prefix}/`.
pub fn draw_radius_chart(
    analysis: &RadiusAnalysis,
    prefix: &str,
    legend: bool,
    plot_dir: &Path,
) -> Result<PathBuf> {
    let path = benchmark_dir(plot_dir, prefix)?.join(format!("{prefix}_improv.svg"));
    let svg_path = path.clone();
    let root = SVGBackend::new(&svg_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let radii: Vec<f64> = analysis.radii.iter().map(|&r| f64::from(r)).collect();
    let max_radius = radii.iter().copied().fold(1.0, f64::max);
    let max_y = analysis
        .improvement
        .iter()
        .chain(&analysis.improvement_incons)
        .copied()
        .fold(0.0, f64::max);
    let max_y = if max_y > 0.0 { max_y * 1.1 } else { 1.0 };
    let (min_ratio, max_ratio) = analysis
        .ratios
        .iter()
        .filter(|r| r.is_finite())
        .fold((f64::MAX, f64::MIN), |(lo, hi), &r| (lo.min(r), hi.max(r)));
    let (min_ratio, max_ratio) = match min_ratio < max_ratio {
        true => {
            let pad = (max_ratio - min_ratio) * 0.05;
            (min_ratio - pad, max_ratio + pad)
        }
        false if min_ratio <= max_ratio => (min_ratio - 1.0, max_ratio + 1.0),
        false => (0.0, 1.0),
    };

    let x_range = 0.0..max_radius * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .caption("Stencil radius analysis", ("sans-serif", CAPTION_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), 0.0..max_y)?
        .set_secondary_coord(x_range, min_ratio..max_ratio);

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Stencil Radius")
        .y_desc("Improvement")
        .label_style(("sans-serif", LABEL_FONT_SIZE))
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("Ratio")
        .label_style(("sans-serif", LABEL_FONT_SIZE))
        .draw()?;

    let improvement = radii.iter().copied().zip(analysis.improvement.iter().copied());
    let incons = radii.iter().copied().zip(analysis.improvement_incons.iter().copied());
    let ratios = radii
        .iter()
        .copied()
        .zip(analysis.ratios.iter().copied())
        .filter(|(_, r)| r.is_finite());

    chart
        .draw_series(LineSeries::new(improvement, BLUE.stroke_width(LINE_WIDTH)))?
        .label("Improvement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(LINE_WIDTH)));
    chart
        .draw_series(LineSeries::new(incons, RED.stroke_width(LINE_WIDTH)))?
        .label("Incons Improvement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(LINE_WIDTH)));
    chart
        .draw_secondary_series(LineSeries::new(ratios, GREEN.stroke_width(LINE_WIDTH)))?
        .label("Ratios")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(LINE_WIDTH))
        });

    if legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LABEL_FONT_SIZE))
            .draw()?;
    }

    root.present()?;
    info!("Plot saved: {}", path.display());
    Ok(path)
}

/// Draws the memory footprint chart as `plot_dir/mem_footprint.svg`, normalized against the base
/// version unless `raw` is set.
pub fn draw_memory_chart(table: &FootprintTable, raw: bool, plot_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(plot_dir)
        .with_context(|| format!("Failed to create {}", plot_dir.display()))?;
    let (name, values, y_desc) = match raw {
        true => ("mem_footprint_raw.svg", table.megabytes(), "Memory Footprint (MB/Locale)"),
        false => ("mem_footprint.svg", table.normalized(), "Normalized Memory Footprint"),
    };
    let path = plot_dir.join(name);

    let svg_path = path.clone();
    let root = SVGBackend::new(&svg_path, (1300, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let nb_benchmarks = table.benchmarks.len();
    let nb_versions = values.len().max(1);
    let max_y = values.iter().flatten().copied().fold(0.0, f64::max);
    let max_y = if max_y > 0.0 { max_y * 1.45 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..(nb_benchmarks as f64 - 0.5), 0.0..max_y)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(nb_benchmarks)
        .x_label_formatter(&|x| {
            let idx = x.round();
            match (x - idx).abs() < 0.3 && idx >= 0.0 {
                true => table
                    .benchmarks
                    .get(idx as usize)
                    .cloned()
                    .unwrap_or_default(),
                false => String::new(),
            }
        })
        .y_desc(y_desc)
        .label_style(("sans-serif", LABEL_FONT_SIZE))
        .draw()?;

    let group_width = 0.8;
    let bar_width = group_width / nb_versions as f64;
    for (v, (version, per_benchmark)) in FOOTPRINT_VERSIONS.iter().zip(&values).enumerate() {
        let style = match version.static_domain {
            true => version.color.mix(0.5).filled(),
            false => version.color.filled(),
        };
        let left = |b: usize| b as f64 - group_width / 2.0 + v as f64 * bar_width;
        chart
            .draw_series(per_benchmark.iter().enumerate().map(|(b, &y)| {
                Rectangle::new([(left(b) + 0.01, 0.0), (left(b) + bar_width - 0.01, y)], style)
            }))?
            .label(version.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperMiddle)
        .background_style(WHITE)
        .border_style(BLACK)
        .label_font(("sans-serif", LABEL_FONT_SIZE))
        .draw()?;

    root.present()?;
    info!("Plot saved: {}", path.display());
    Ok(path)
}
