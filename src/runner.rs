use crate::compute::{absolute_chart, normalized_chart, ChartData};
use crate::config::ReportConfig;
use crate::errors::{BenchPlotError, BenchPlotResult};
use crate::io;
use crate::model::BenchmarkSet;
use crate::observability::{InputFileStats, Metrics, RunSummary};
use crate::render::{parse_palette, render_chart};
use crate::viewer;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub struct ReportOutcome {
    pub absolute: ChartData,
    pub normalized: ChartData,
    /// Images written, empty on a dry run.
    pub charts: Vec<PathBuf>,
    pub metrics: Metrics,
}

pub fn execute_report(config: &ReportConfig, run_id: Uuid) -> BenchPlotResult<ReportOutcome> {
    config.validate()?;
    let palette = parse_palette(&config.palette)?;
    let mut metrics = Metrics::new();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .map_err(|e| BenchPlotError::Unknown(e.into()))?,
    );

    // 1. Discovery
    info!(
        "Looking for {:?} in {:?}",
        config.pattern, config.input_dir
    );
    pb.set_message("Discovering timing files...");
    let inputs = metrics.time_step("discover", || {
        io::discover_inputs(&config.input_dir, &config.pattern)
    })?;

    // 2. Load; any failure aborts before a chart is written
    pb.set_message(format!("Reading {} timing files...", inputs.len()));
    let records = metrics.time_step("load", || io::load_records(&inputs, config))?;
    metrics.files_read = records.len();
    metrics.rows_read = records.iter().map(|r| r.labels().len()).sum();
    info!(
        "Loaded {} benchmarks ({} rows)",
        metrics.files_read, metrics.rows_read
    );

    // 3. Validate and build chart data
    let set = BenchmarkSet::new(records, config.baseline.as_deref())?;
    info!(
        "Modes {:?}, baseline {:?}",
        set.modes(),
        set.baseline_label()
    );
    let absolute = absolute_chart(&set, config)?;
    let normalized = normalized_chart(&set, config)?;

    // 4. Render
    let mut charts = Vec::new();
    if config.dry_run {
        info!("Dry run, skipping chart rendering");
    } else {
        pb.set_message("Rendering charts...");
        let jobs = [
            (&absolute, config.absolute_path()),
            (&normalized, config.normalized_path()),
        ];
        let start = std::time::Instant::now();
        for (chart, path) in jobs {
            render_chart(chart, &palette, config.image_size, &path)?;
            info!("Saved {:?}", path);
            charts.push(path);
        }
        metrics.record_step("render", start.elapsed());
    }
    pb.finish_and_clear();

    if config.show {
        for path in &charts {
            viewer::show(path);
        }
    }

    if let Some(summary_path) = &config.summary_path {
        let inputs = inputs
            .iter()
            .map(InputFileStats::from_path)
            .collect::<std::io::Result<Vec<_>>>()?;
        RunSummary {
            run_id,
            timestamp: Utc::now(),
            inputs,
            charts: &charts,
            absolute: &absolute,
            normalized: &normalized,
            metrics: &metrics,
        }
        .write(summary_path)?;
    }

    info!(
        "Report completed in {} ms",
        metrics.total_duration().as_millis()
    );
    Ok(ReportOutcome {
        absolute,
        normalized,
        charts,
        metrics,
    })
}
