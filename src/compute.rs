//! Chart data derived from a [`BenchmarkSet`], independent of the drawing
//! backend. The renderer draws it and the run summary serializes it.

use crate::config::ReportConfig;
use crate::errors::{BenchPlotError, BenchPlotResult};
use crate::model::BenchmarkSet;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    /// Index into the palette; the mode's position in the set.
    pub color_index: usize,
    /// One value per benchmark. Non-finite values are not drawn.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub benchmarks: Vec<String>,
    pub bar_width: f64,
    pub series: Vec<ChartSeries>,
    pub reference_line: Option<ReferenceLine>,
}

impl ChartData {
    pub fn series(&self, label: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Largest finite value drawn, including the reference line.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .chain(self.reference_line.iter().map(|r| r.y))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

fn check_palette(modes: usize, config: &ReportConfig) -> BenchPlotResult<()> {
    if modes > config.palette.len() {
        return Err(BenchPlotError::PaletteExhausted {
            modes,
            colors: config.palette.len(),
        });
    }
    Ok(())
}

/// One bar per mode and benchmark, in milliseconds.
pub fn absolute_chart(set: &BenchmarkSet, config: &ReportConfig) -> BenchPlotResult<ChartData> {
    check_palette(set.modes().len(), config)?;

    let series = set
        .modes()
        .iter()
        .enumerate()
        .map(|(i, label)| ChartSeries {
            label: label.clone(),
            color_index: i,
            values: set.mode_times(i),
        })
        .collect();

    Ok(ChartData {
        title: config.absolute.title.clone(),
        x_label: config.absolute.x_label.clone(),
        y_label: config.absolute.y_label.clone(),
        benchmarks: set.names().to_vec(),
        bar_width: config.bar_width,
        series,
        reference_line: None,
    })
}

/// Every mode except the baseline as a ratio of the baseline time, plus a
/// reference line at 1.0 standing in for the baseline.
pub fn normalized_chart(set: &BenchmarkSet, config: &ReportConfig) -> BenchPlotResult<ChartData> {
    check_palette(set.modes().len(), config)?;

    let baseline = set.mode_times(set.baseline());
    let series = set
        .modes()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != set.baseline())
        .map(|(i, label)| {
            let values = set
                .mode_times(i)
                .iter()
                .zip(&baseline)
                .zip(set.names())
                .map(|((time, base), name)| {
                    let ratio = time / base;
                    if !ratio.is_finite() {
                        warn!(
                            "{}: {} is {} ms against a {} ms baseline, bar skipped",
                            name, label, time, base
                        );
                    }
                    ratio
                })
                .collect();
            ChartSeries {
                label: label.clone(),
                color_index: i,
                values,
            }
        })
        .collect();

    Ok(ChartData {
        title: config.normalized.title.clone(),
        x_label: config.normalized.x_label.clone(),
        y_label: config.normalized.y_label.clone(),
        benchmarks: set.names().to_vec(),
        bar_width: config.bar_width,
        series,
        reference_line: Some(ReferenceLine {
            label: config.normalized.baseline_label.clone(),
            y: 1.0,
        }),
    })
}
