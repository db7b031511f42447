use anyhow::Result;
use benchplot::config::ReportConfig;
use benchplot::errors::BenchPlotError;
use benchplot::runner::execute_report;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use uuid::Uuid;

fn write_scenario(dir: &Path) {
    fs::write(
        dir.join("a_timing.csv"),
        "Optimization,RealTime\nO0,2s\nO3,1s\n",
    )
    .unwrap();
    fs::write(
        dir.join("b_timing.csv"),
        "Optimization,RealTime\nO0,1m0s\nO3,30s\n",
    )
    .unwrap();
}

fn config_for(input: &Path, output: &Path) -> ReportConfig {
    ReportConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..Default::default()
    }
}

/// Two benchmarks, two modes: the chart data the images are drawn from.
#[test]
fn test_end_to_end_chart_data() -> Result<()> {
    let dir = tempdir()?;
    write_scenario(dir.path());
    let config = ReportConfig {
        dry_run: true,
        ..config_for(dir.path(), &dir.path().join("out"))
    };

    let outcome = execute_report(&config, Uuid::new_v4())?;

    assert_eq!(outcome.absolute.benchmarks, vec!["a", "b"]);
    assert_eq!(
        outcome.absolute.series("O0").unwrap().values,
        vec![2000.0, 60000.0]
    );
    assert_eq!(
        outcome.absolute.series("O3").unwrap().values,
        vec![1000.0, 30000.0]
    );

    assert!(outcome.normalized.series("O0").is_none());
    assert_eq!(outcome.normalized.series("O3").unwrap().values, vec![0.5, 0.5]);

    assert!(outcome.charts.is_empty());
    assert!(!dir.path().join("out").exists());
    assert_eq!(outcome.metrics.files_read, 2);
    assert_eq!(outcome.metrics.rows_read, 4);
    Ok(())
}

#[test]
fn test_renders_both_charts_reproducibly() -> Result<()> {
    let dir = tempdir()?;
    write_scenario(dir.path());
    let out = dir.path().join("charts");
    let config = config_for(dir.path(), &out);

    let first = execute_report(&config, Uuid::new_v4())?;
    assert_eq!(
        first.charts,
        vec![
            out.join("real_time_benchmark_modes.png"),
            out.join("normalized_real_time_benchmark_modes.png"),
        ]
    );
    let images: Vec<Vec<u8>> = first
        .charts
        .iter()
        .map(fs::read)
        .collect::<std::io::Result<_>>()?;
    for image in &images {
        // PNG signature
        assert_eq!(&image[..8], b"\x89PNG\r\n\x1a\n");
    }

    let second = execute_report(&config, Uuid::new_v4())?;
    for (path, before) in second.charts.iter().zip(&images) {
        assert_eq!(&fs::read(path)?, before, "{path:?} changed between runs");
    }
    Ok(())
}

#[test]
fn test_named_baseline_with_reordered_rows() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("fib_timing.csv"),
        "Optimization,RealTime\nllvm,4s\nno-optimizations,8s\n",
    )?;
    fs::write(
        dir.path().join("sort_timing.csv"),
        "Optimization,RealTime\nno-optimizations,1m0s\nllvm,15s\n",
    )?;
    let config = ReportConfig {
        baseline: Some("no-optimizations".to_string()),
        dry_run: true,
        ..config_for(dir.path(), dir.path())
    };

    let outcome = execute_report(&config, Uuid::new_v4())?;

    let llvm = outcome.normalized.series("llvm").unwrap();
    assert_eq!(llvm.values, vec![0.5, 0.25]);
    assert_eq!(llvm.color_index, 0);
    assert_eq!(outcome.normalized.series.len(), 1);
    Ok(())
}

#[test]
fn test_inconsistent_modes_abort_before_rendering() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("a_timing.csv"),
        "Optimization,RealTime\nO0,2s\nO3,1s\n",
    )?;
    fs::write(
        dir.path().join("b_timing.csv"),
        "Optimization,RealTime\nO0,2s\nO2,1.5s\nO3,1s\n",
    )?;
    let out = dir.path().join("out");

    let err = execute_report(&config_for(dir.path(), &out), Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, BenchPlotError::InconsistentModes { .. }));
    assert!(!out.join("real_time_benchmark_modes.png").exists());
    Ok(())
}

#[test]
fn test_missing_column_aborts() -> Result<()> {
    let dir = tempdir()?;
    write_scenario(dir.path());
    fs::write(dir.path().join("c_timing.csv"), "Optimization,Time\nO0,1s\n")?;

    let config = ReportConfig {
        dry_run: true,
        ..config_for(dir.path(), dir.path())
    };
    let err = execute_report(&config, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, BenchPlotError::MissingColumn { .. }));
    Ok(())
}

#[test]
fn test_summary_written() -> Result<()> {
    let dir = tempdir()?;
    write_scenario(dir.path());
    let summary_path = dir.path().join("reports/summary.json");
    let config = ReportConfig {
        dry_run: true,
        summary_path: Some(summary_path.clone()),
        ..config_for(dir.path(), dir.path())
    };

    let run_id = Uuid::new_v4();
    execute_report(&config, run_id)?;

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary_path)?)?;
    assert_eq!(summary["run_id"], run_id.to_string());
    assert_eq!(summary["inputs"].as_array().unwrap().len(), 2);
    assert_eq!(summary["inputs"][0]["hash"].as_str().unwrap().len(), 64);
    assert_eq!(
        summary["normalized"]["series"][0]["values"],
        serde_json::json!([0.5, 0.5])
    );
    assert_eq!(summary["normalized"]["reference_line"]["y"], 1.0);
    Ok(())
}
