use crate::duration::DurationPolicy;
use crate::errors::{BenchPlotError, BenchPlotResult};
use crate::render::parse_color;
use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Report settings. Every field is optional in YAML; missing fields take
/// the values the benchmark harness has always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub input_dir: PathBuf,
    pub pattern: String,
    /// Stripped from file names to get the benchmark name.
    pub name_suffix: String,
    pub label_column: String,
    pub time_column: String,
    /// Mode label to normalize against. `None` means the first mode.
    pub baseline: Option<String>,
    pub durations: DurationPolicy,
    pub output_dir: PathBuf,
    pub bar_width: f64,
    pub palette: Vec<String>,
    pub image_size: (u32, u32),
    pub absolute: AbsoluteChart,
    pub normalized: NormalizedChart,
    pub show: bool,
    pub summary_path: Option<PathBuf>,
    pub dry_run: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("res"),
            pattern: "*.csv".to_string(),
            name_suffix: "_timing.csv".to_string(),
            label_column: "Optimization".to_string(),
            time_column: "RealTime".to_string(),
            baseline: None,
            durations: DurationPolicy::Lenient,
            output_dir: PathBuf::from("."),
            bar_width: 0.2,
            palette: ["blue", "green", "red", "purple"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            image_size: (1000, 600),
            absolute: AbsoluteChart::default(),
            normalized: NormalizedChart::default(),
            show: false,
            summary_path: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AbsoluteChart {
    pub file: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for AbsoluteChart {
    fn default() -> Self {
        Self {
            file: "real_time_benchmark_modes.png".to_string(),
            title: "Native Compiler vs LLVM Performance".to_string(),
            x_label: "Benchmark".to_string(),
            y_label: "Real Time (milliseconds)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizedChart {
    pub file: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry of the reference line at 1.0.
    pub baseline_label: String,
}

impl Default for NormalizedChart {
    fn default() -> Self {
        Self {
            file: "normalized_real_time_benchmark_modes.png".to_string(),
            title: "Normalized Real Time for Different Optimization Levels (w.r.t No Optimizations)"
                .to_string(),
            x_label: "Benchmark".to_string(),
            y_label: "Normalized Real Time (w.r.t No Optimizations)".to_string(),
            baseline_label: "No Optimizations Baseline".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> BenchPlotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> BenchPlotResult<Self> {
        // An empty file is a valid config with every default.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| {
            let span: Option<SourceSpan> = e.location().map(|loc| (loc.index(), 1).into());
            BenchPlotError::ConfigError(e, span)
        })
    }

    pub fn validate(&self) -> BenchPlotResult<()> {
        if !(self.bar_width > 0.0 && self.bar_width <= 1.0) {
            return Err(BenchPlotError::config(format!(
                "bar_width must be in (0, 1], got {}",
                self.bar_width
            )));
        }
        if self.palette.is_empty() {
            return Err(BenchPlotError::config("palette must not be empty"));
        }
        if let Some(bad) = self.palette.iter().find(|c| parse_color(c).is_none()) {
            return Err(BenchPlotError::config(format!("unknown palette color {bad:?}")));
        }
        if self.image_size.0 == 0 || self.image_size.1 == 0 {
            return Err(BenchPlotError::config("image_size must be non-zero"));
        }
        if self.pattern.is_empty() {
            return Err(BenchPlotError::config("pattern must not be empty"));
        }
        Ok(())
    }

    pub fn absolute_path(&self) -> PathBuf {
        self.output_dir.join(&self.absolute.file)
    }

    pub fn normalized_path(&self) -> PathBuf {
        self.output_dir.join(&self.normalized.file)
    }
}
