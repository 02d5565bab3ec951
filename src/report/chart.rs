//! Chart image rendering with plotters (SVG output)

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::dashboard::{Chart, ChartKind, ColorScale, Plot, Series};
use crate::pipeline::{box_stats, density, Histogram};

/// Image size in pixels
pub const CHART_SIZE: (u32, u32) = (960, 640);

/// Series colors, in draw order
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// Fill for heatmap cells without a coefficient
const MISSING_CELL: RGBColor = RGBColor(220, 220, 220);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn draw_err<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow!("chart rendering failed: {}", err)
}

fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Render a chart into an SVG document
pub fn render_svg(chart: &Chart) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match &chart.plot {
            Plot::Categories {
                kind,
                categories,
                series,
                stacked,
            } => draw_categories(&root, chart, *kind, categories, series, *stacked)?,
            Plot::Heatmap {
                labels,
                values,
                scale,
            } => draw_heatmap(&root, chart, labels, values, *scale)?,
            Plot::Histogram(histogram) => draw_histogram(&root, chart, histogram)?,
            Plot::Distribution { kind, samples } => draw_distribution(&root, chart, *kind, samples)?,
        }

        root.present().map_err(draw_err)?;
    }
    Ok(svg)
}

/// Render `chart` to `<dir>/<chart.name>.svg`
pub fn write_chart(chart: &Chart, dir: &Path) -> Result<PathBuf> {
    let svg = render_svg(chart)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(format!("{}.svg", chart.name));
    std::fs::write(&path, svg)
        .with_context(|| format!("Failed to write chart: {}", path.display()))?;
    Ok(path)
}

/// Label for a category axis position; empty between categories
fn label_at(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Pad a value range so bars and markers do not touch the frame
fn padded(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = (max - min).abs();
    let pad = if span == 0.0 { 1.0 } else { span * 0.1 };
    (min - pad, max + pad)
}

fn draw_categories(
    root: &Area<'_>,
    chart: &Chart,
    kind: ChartKind,
    categories: &[String],
    series: &[Series],
    stacked: bool,
) -> Result<()> {
    let n = categories.len().max(1);
    let stacked = stacked && kind == ChartKind::Bar;

    let values = series.iter().flat_map(|s| s.values.iter().flatten().copied());
    let (mut y_min, mut y_max) = values.fold((0.0f64, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if stacked {
        y_max = (0..categories.len())
            .map(|i| {
                series
                    .iter()
                    .filter_map(|s| s.values.get(i).copied().flatten())
                    .sum::<f64>()
            })
            .fold(0.0, f64::max);
    }
    if !y_max.is_finite() {
        y_max = 1.0;
    }
    let (lo, hi) = padded(y_min, y_max);
    y_min = if y_min >= 0.0 { 0.0 } else { lo };

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..hi)
        .map_err(draw_err)?;

    let formatter = |x: &f64| label_at(categories, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&formatter)
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(draw_err)?;

    let group_width = 0.8;
    let bar_width = if stacked {
        group_width
    } else {
        group_width / series.len().max(1) as f64
    };
    let mut base = vec![0.0f64; categories.len()];

    for (k, s) in series.iter().enumerate() {
        let color = series_color(k);
        let anno = match kind {
            ChartKind::Line => {
                let points: Vec<(f64, f64)> = s
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                    .collect();
                ctx.draw_series(
                    points
                        .iter()
                        .map(|p| Circle::new(*p, 4, color.filled())),
                )
                .map_err(draw_err)?;
                ctx.draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(draw_err)?
            }
            _ => {
                let mut bars = Vec::with_capacity(s.values.len());
                for (i, v) in s.values.iter().enumerate() {
                    let Some(v) = v else { continue };
                    let (x0, y0) = if stacked {
                        (i as f64 - group_width / 2.0, base[i])
                    } else {
                        (i as f64 - group_width / 2.0 + k as f64 * bar_width, 0.0)
                    };
                    let y1 = y0 + v;
                    if stacked {
                        base[i] = y1;
                    }
                    bars.push(Rectangle::new([(x0, y0), (x0 + bar_width, y1)], color.filled()));
                }
                ctx.draw_series(bars).map_err(draw_err)?
            }
        };
        anno.label(s.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    if !series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
    }
    Ok(())
}

fn draw_heatmap(
    root: &Area<'_>,
    chart: &Chart,
    labels: &[String],
    values: &[Vec<Option<f64>>],
    scale: ColorScale,
) -> Result<()> {
    let n = labels.len().max(1);
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(90)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), -0.5f64..(n as f64 - 0.5))
        .map_err(draw_err)?;

    let formatter = |x: &f64| label_at(labels, *x);
    ctx.configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&formatter)
        .y_label_formatter(&formatter)
        .x_label_style(("sans-serif", 10))
        .y_label_style(("sans-serif", 10))
        .draw()
        .map_err(draw_err)?;

    let cells = (0..labels.len()).flat_map(|i| (0..labels.len()).map(move |j| (i, j)));
    ctx.draw_series(cells.map(|(i, j)| {
        let fill = values
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .flatten()
            .map(|v| scale_color(scale, v))
            .unwrap_or(MISSING_CELL);
        let (x, y) = (j as f64, i as f64);
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled())
    }))
    .map_err(draw_err)?;

    Ok(())
}

fn draw_histogram(root: &Area<'_>, chart: &Chart, histogram: &Histogram) -> Result<()> {
    let lower = histogram.lower;
    let upper = lower + histogram.width * histogram.bins() as f64;
    let top = histogram.counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(lower..upper, 0f64..top)
        .map_err(draw_err)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_label_formatter(&|x: &f64| format!("{:.2}", x))
        .draw()
        .map_err(draw_err)?;

    let color = series_color(0);
    ctx.draw_series(histogram.counts.iter().enumerate().map(|(i, c)| {
        let (l, r) = histogram.bin_range(i);
        Rectangle::new([(l, 0.0), (r, *c as f64)], color.mix(0.7).filled())
    }))
    .map_err(draw_err)?;
    ctx.draw_series(histogram.counts.iter().enumerate().map(|(i, c)| {
        let (l, r) = histogram.bin_range(i);
        Rectangle::new([(l, 0.0), (r, *c as f64)], BLACK.stroke_width(1))
    }))
    .map_err(draw_err)?;

    Ok(())
}

fn draw_distribution(
    root: &Area<'_>,
    chart: &Chart,
    kind: ChartKind,
    samples: &[(String, Vec<f64>)],
) -> Result<()> {
    let n = samples.len().max(1);
    let all = samples.iter().flat_map(|(_, v)| v.iter().copied());
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (y_min, y_max) = padded(min, max);
    let labels: Vec<String> = samples.iter().map(|(name, _)| name.clone()).collect();

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
        .map_err(draw_err)?;

    let formatter = |x: &f64| label_at(&labels, *x);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&formatter)
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()
        .map_err(draw_err)?;

    for (k, (_, values)) in samples.iter().enumerate() {
        let color = series_color(k);
        let x = k as f64;
        let Some(stats) = box_stats(values) else {
            continue;
        };

        if kind == ChartKind::Violin {
            let curve = density(values, 64);
            let peak = curve.iter().map(|(_, d)| *d).fold(0.0, f64::max);
            if peak > 0.0 {
                let mut outline: Vec<(f64, f64)> = curve
                    .iter()
                    .map(|(y, d)| (x - 0.4 * d / peak, *y))
                    .collect();
                outline.extend(curve.iter().rev().map(|(y, d)| (x + 0.4 * d / peak, *y)));
                ctx.draw_series(std::iter::once(Polygon::new(outline, color.mix(0.5).filled())))
                    .map_err(draw_err)?;
            }
            ctx.draw_series(std::iter::once(PathElement::new(
                vec![(x - 0.15, stats.median), (x + 0.15, stats.median)],
                BLACK.stroke_width(2),
            )))
            .map_err(draw_err)?;
        } else {
            ctx.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.3, stats.q1), (x + 0.3, stats.q3)],
                color.mix(0.6).filled(),
            )))
            .map_err(draw_err)?;
            ctx.draw_series(vec![
                PathElement::new(vec![(x - 0.3, stats.median), (x + 0.3, stats.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(x, stats.q3), (x, stats.upper_whisker)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x, stats.q1), (x, stats.lower_whisker)], BLACK.stroke_width(1)),
                PathElement::new(
                    vec![(x - 0.15, stats.upper_whisker), (x + 0.15, stats.upper_whisker)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![(x - 0.15, stats.lower_whisker), (x + 0.15, stats.lower_whisker)],
                    BLACK.stroke_width(1),
                ),
            ])
            .map_err(draw_err)?;
        }

        ctx.draw_series(
            stats
                .outliers
                .iter()
                .map(|v| Circle::new((x, *v), 3, color.filled())),
        )
        .map_err(draw_err)?;
    }

    Ok(())
}

/// Gradient stops of each scale, low end first
fn stops(scale: ColorScale) -> &'static [(u8, u8, u8)] {
    match scale {
        ColorScale::RdBuR => &[
            (5, 48, 97),
            (33, 102, 172),
            (67, 147, 195),
            (146, 197, 222),
            (209, 229, 240),
            (247, 247, 247),
            (253, 219, 199),
            (244, 165, 130),
            (214, 96, 77),
            (178, 24, 43),
            (103, 0, 31),
        ],
        ColorScale::Bluered => &[(0, 0, 255), (255, 0, 0)],
        ColorScale::Viridis => &[
            (68, 1, 84),
            (72, 40, 120),
            (62, 74, 137),
            (49, 104, 142),
            (38, 130, 142),
            (31, 158, 137),
            (53, 183, 121),
            (109, 205, 89),
            (180, 222, 44),
            (253, 231, 37),
        ],
        ColorScale::Spectral => &[
            (158, 1, 66),
            (213, 62, 79),
            (244, 109, 67),
            (253, 174, 97),
            (254, 224, 139),
            (255, 255, 191),
            (230, 245, 152),
            (171, 221, 164),
            (102, 194, 165),
            (50, 136, 189),
            (94, 79, 162),
        ],
        ColorScale::Picnic => &[
            (0, 0, 255),
            (51, 153, 255),
            (102, 204, 255),
            (153, 204, 255),
            (204, 204, 255),
            (255, 255, 255),
            (255, 204, 255),
            (255, 153, 255),
            (255, 102, 204),
            (255, 102, 102),
            (255, 0, 0),
        ],
    }
}

/// Color of a correlation coefficient in `[-1, 1]` on `scale`
pub fn scale_color(scale: ColorScale, value: f64) -> RGBColor {
    let stops = stops(scale);
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) * (stops.len() - 1) as f64;
    let i = (t.floor() as usize).min(stops.len() - 2);
    let frac = t - i as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[i], stops[i + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
