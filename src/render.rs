//! Grouped bar charts drawn to PNG with plotters.
//!
//! The font is compiled into the binary so a chart renders the same on every
//! machine, with or without system fonts.

use crate::compute::ChartData;
use crate::errors::{BenchPlotError, BenchPlotResult};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fmt::Display;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

static FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

const FONT_FAMILY: &str = "sans-serif";

fn ensure_font() -> BenchPlotResult<()> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if registered {
        Ok(())
    } else {
        Err(BenchPlotError::Unknown(anyhow::anyhow!(
            "Embedded font could not be loaded"
        )))
    }
}

/// Named colors accepted in the palette, or `#rrggbb`.
pub fn parse_color(name: &str) -> Option<RGBColor> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(RGBColor(channel(0)?, channel(2)?, channel(4)?));
    }
    let rgb = match name.to_ascii_lowercase().as_str() {
        "blue" => (0, 0, 255),
        "green" => (0, 128, 0),
        "red" => (255, 0, 0),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "yellow" => (255, 255, 0),
        "black" => (0, 0, 0),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(RGBColor(rgb.0, rgb.1, rgb.2))
}

pub fn parse_palette(names: &[String]) -> BenchPlotResult<Vec<RGBColor>> {
    names
        .iter()
        .map(|n| {
            parse_color(n)
                .ok_or_else(|| BenchPlotError::config(format!("unknown palette color {n:?}")))
        })
        .collect()
}

fn render_error<E: Display>(path: &Path, err: E) -> BenchPlotError {
    BenchPlotError::RenderError {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Horizontal extent of the plot: groups sit on integer positions and the
/// margin grows with the group width.
fn x_extent(groups: usize, group_width: f64) -> (f64, f64) {
    let half = (group_width / 2.0 + 0.1).max(0.5);
    (-half, (groups.max(1) - 1) as f64 + half)
}

/// Top of the value axis. The space above the tallest bar grows with the
/// number of legend entries so the upper-right legend covers neither bars nor
/// the reference line.
fn y_extent(max_value: f64, legend_entries: usize) -> f64 {
    let headroom = 1.1 + 0.08 * legend_entries as f64;
    if max_value > 0.0 {
        max_value * headroom
    } else {
        headroom
    }
}

/// Axis label at `x`: the benchmark name on its group position, nothing on
/// the ticks in between.
fn tick_label(benchmarks: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    benchmarks
        .get(nearest as usize)
        .cloned()
        .unwrap_or_default()
}

/// Draw `chart` as a grouped bar chart and write it to `path`.
pub fn render_chart(
    chart: &ChartData,
    palette: &[RGBColor],
    size: (u32, u32),
    path: &Path,
) -> BenchPlotResult<()> {
    ensure_font()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let colors = chart
        .series
        .iter()
        .map(|s| {
            palette
                .get(s.color_index)
                .copied()
                .ok_or(BenchPlotError::PaletteExhausted {
                    modes: s.color_index + 1,
                    colors: palette.len(),
                })
        })
        .collect::<BenchPlotResult<Vec<_>>>()?;

    let groups = chart.benchmarks.len();
    let bar_width = chart.bar_width;
    let group_width = bar_width * chart.series.len() as f64;
    let (x_min, x_max) = x_extent(groups, group_width);
    let legend_entries = chart.series.len() + usize::from(chart.reference_line.is_some());
    let y_max = y_extent(chart.max_value(), legend_entries);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (FONT_FAMILY, 20))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(75)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(|e| render_error(path, e))?;

    let name_at = |x: &f64| tick_label(&chart.benchmarks, *x);
    // Enough tick hints that the axis steps by at most 0.5, so every group
    // position gets a tick.
    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(groups.max(1) * 2 + 1)
        .x_label_formatter(&name_at)
        .axis_desc_style((FONT_FAMILY, 15))
        .draw()
        .map_err(|e| render_error(path, e))?;

    for (pos, (series, color)) in chart.series.iter().zip(colors).enumerate() {
        let offset = -group_width / 2.0 + pos as f64 * bar_width;
        ctx.draw_series(
            series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(move |(g, v)| {
                    let x0 = g as f64 + offset;
                    Rectangle::new([(x0, 0.0), (x0 + bar_width, *v)], color.filled())
                }),
        )
        .map_err(|e| render_error(path, e))?
        .label(series.label.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    if let Some(line) = &chart.reference_line {
        ctx.draw_series(DashedLineSeries::new(
            vec![(x_min, line.y), (x_max, line.y)],
            10,
            6,
            BLACK.stroke_width(2),
        ))
        .map_err(|e| render_error(path, e))?
        .label(line.label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLACK.stroke_width(2)));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT_FAMILY, 14))
        .draw()
        .map_err(|e| render_error(path, e))?;

    root.present().map_err(|e| render_error(path, e))?;
    debug!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ChartSeries, ReferenceLine};

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("blue"), Some(RGBColor(0, 0, 255)));
        assert_eq!(parse_color("Green"), Some(RGBColor(0, 128, 0)));
        assert_eq!(parse_color("purple"), Some(RGBColor(128, 0, 128)));
        assert_eq!(parse_color("vermilion"), None);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#ff8000"), Some(RGBColor(255, 128, 0)));
        assert_eq!(parse_color("#FF8000"), Some(RGBColor(255, 128, 0)));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn test_parse_palette() {
        let names = vec!["red".to_string(), "#000000".to_string()];
        assert_eq!(
            parse_palette(&names).unwrap(),
            vec![RGBColor(255, 0, 0), RGBColor(0, 0, 0)]
        );
        assert!(parse_palette(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_extents() {
        assert_eq!(x_extent(2, 0.4), (-0.5, 1.5));
        let (lo, hi) = x_extent(1, 1.6);
        assert!((lo + 0.9).abs() < 1e-9);
        assert!((hi - 0.9).abs() < 1e-9);
        assert!((y_extent(0.0, 0) - 1.1).abs() < 1e-9);
        assert!((y_extent(100.0, 0) - 110.0).abs() < 1e-9);
        assert!((y_extent(100.0, 5) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_line_clears_legend() {
        // Three modes below the baseline: the tallest thing drawn is the
        // reference line at 1.0, with four legend entries above it.
        let y_max = y_extent(1.0, 4);
        let free_fraction = 1.0 - 1.0 / y_max;
        assert!(free_fraction > 0.25, "only {free_fraction} above the line");
    }

    #[test]
    fn test_tick_label() {
        let names = vec!["fib".to_string(), "nbody".to_string()];
        assert_eq!(tick_label(&names, 0.0), "fib");
        assert_eq!(tick_label(&names, 1.0000001), "nbody");
        assert_eq!(tick_label(&names, 0.5), "");
        assert_eq!(tick_label(&names, -0.5), "");
        assert_eq!(tick_label(&names, -1.0), "");
        assert_eq!(tick_label(&names, 2.0), "");
    }

    fn sample_chart(reference: bool) -> ChartData {
        ChartData {
            title: "Timings".to_string(),
            x_label: "Benchmark".to_string(),
            y_label: "ms".to_string(),
            benchmarks: vec!["fib".to_string(), "nbody".to_string()],
            bar_width: 0.2,
            series: vec![
                ChartSeries {
                    label: "O0".to_string(),
                    color_index: 0,
                    values: vec![2000.0, 60000.0],
                },
                ChartSeries {
                    label: "O3".to_string(),
                    color_index: 1,
                    values: vec![1000.0, f64::NAN],
                },
            ],
            reference_line: reference.then(|| ReferenceLine {
                label: "Baseline".to_string(),
                y: 1.0,
            }),
        }
    }

    #[test]
    fn test_render_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let palette = vec![RGBColor(0, 0, 255), RGBColor(0, 128, 0)];
        for (reference, file) in [(false, "abs.png"), (true, "nested/norm.png")] {
            let path = dir.path().join(file);
            render_chart(&sample_chart(reference), &palette, (400, 300), &path).unwrap();
            let bytes = std::fs::read(&path).unwrap();
            assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"), "{file} is not a PNG");
        }
    }

    #[test]
    fn test_render_chart_palette_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let err = render_chart(&sample_chart(false), &[RGBColor(0, 0, 255)], (400, 300), &path)
            .unwrap_err();
        assert!(matches!(err, BenchPlotError::PaletteExhausted { .. }));
        assert!(!path.exists());
    }
}
