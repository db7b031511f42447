use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

use crate::duration::DurationError;

#[derive(Error, Diagnostic, Debug)]
pub enum BenchPlotError {
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code("BENCHPLOT-001"),
        help("Please check your report.yaml syntax and structure.")
    )]
    ConfigError(#[source] serde_yaml::Error, #[label("here")] Option<SourceSpan>),

    #[error("I/O error: {0}")]
    #[diagnostic(code("BENCHPLOT-002"), help("Check file paths and permissions."))]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    #[diagnostic(
        code("BENCHPLOT-003"),
        help("The timing file could not be read as CSV.")
    )]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("No files matching {pattern:?} found in {dir:?}")]
    #[diagnostic(
        code("BENCHPLOT-004"),
        help("Point --input-dir at the directory holding the *_timing.csv files.")
    )]
    NoInputs { dir: PathBuf, pattern: String },

    #[error("Column {column:?} missing from {path:?}")]
    #[diagnostic(
        code("BENCHPLOT-005"),
        help("Every timing file needs a header row with the label and time columns.")
    )]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid record in {path:?}: {reason}")]
    #[diagnostic(code("BENCHPLOT-006"))]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Duration error in {path:?}: {source}")]
    #[diagnostic(
        code("BENCHPLOT-007"),
        help("Durations look like \"45s\" or \"1m30s\". Drop --strict-durations to read unknown values as 0.")
    )]
    DurationError {
        path: PathBuf,
        #[source]
        source: DurationError,
    },

    #[error("Benchmark {benchmark:?} has modes {found:?}, expected {expected:?}")]
    #[diagnostic(
        code("BENCHPLOT-008"),
        help("All timing files must list the same optimization modes.")
    )]
    InconsistentModes {
        benchmark: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Baseline mode {baseline:?} not found among {modes:?}")]
    #[diagnostic(code("BENCHPLOT-009"))]
    MissingBaseline { baseline: String, modes: Vec<String> },

    #[error("{modes} modes but only {colors} palette colors")]
    #[diagnostic(code("BENCHPLOT-010"), help("Add colors to the palette setting."))]
    PaletteExhausted { modes: usize, colors: usize },

    #[error("Rendering {path:?} failed: {reason}")]
    #[diagnostic(code("BENCHPLOT-011"))]
    RenderError { path: PathBuf, reason: String },

    #[error(transparent)]
    #[diagnostic(code("BENCHPLOT-000"))]
    Unknown(#[from] anyhow::Error),
}

impl BenchPlotError {
    pub fn config(message: impl std::fmt::Display) -> Self {
        use serde::de::Error;
        BenchPlotError::ConfigError(serde_yaml::Error::custom(message), None)
    }
}

pub type BenchPlotResult<T> = Result<T, BenchPlotError>;
