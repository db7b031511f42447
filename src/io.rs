use crate::config::ReportConfig;
use crate::errors::{BenchPlotError, BenchPlotResult};
use crate::model::BenchmarkRecord;
use polars::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Translate a file name glob (`*`, `?`) into an anchored regex.
fn glob_to_regex(pattern: &str) -> BenchPlotResult<Regex> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| BenchPlotError::config(format!("bad pattern {pattern:?}: {e}")))
}

/// Regular files in `dir` whose name matches `pattern`, sorted by name.
pub fn discover_inputs<P: AsRef<Path>>(dir: P, pattern: &str) -> BenchPlotResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let matcher = glob_to_regex(pattern)?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        if file_name.to_str().is_some_and(|n| matcher.is_match(n)) {
            files.push(entry.path());
        }
    }

    if files.is_empty() {
        return Err(BenchPlotError::NoInputs {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    files.sort();
    debug!("Discovered {} timing files in {:?}", files.len(), dir);
    Ok(files)
}

/// `"foo_timing.csv"` -> `"foo"`. Names without the suffix are kept as is.
pub fn benchmark_name(file_name: &str, suffix: &str) -> String {
    file_name
        .strip_suffix(suffix)
        .unwrap_or(file_name)
        .to_string()
}

/// Read every column as a string so duration cells never get type-inferred.
pub fn read_csv<P: AsRef<Path>>(path: P) -> BenchPlotResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()
        .map_err(BenchPlotError::PolarsError)
}

fn string_column<'a>(
    df: &'a DataFrame,
    path: &Path,
    column: &str,
) -> BenchPlotResult<&'a StringChunked> {
    if df.get_column_index(column).is_none() {
        return Err(BenchPlotError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }
    Ok(df.column(column)?.str()?)
}

/// Load one timing file into a record.
pub fn load_record<P: AsRef<Path>>(path: P, config: &ReportConfig) -> BenchPlotResult<BenchmarkRecord> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BenchPlotError::InvalidRecord {
            path: path.to_path_buf(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;
    let name = benchmark_name(file_name, &config.name_suffix);

    let df = read_csv(path)?;
    let labels = string_column(&df, path, &config.label_column)?;
    let times = string_column(&df, path, &config.time_column)?;

    let labels = labels
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label
                .map(|l| l.trim().to_string())
                .ok_or_else(|| BenchPlotError::InvalidRecord {
                    path: path.to_path_buf(),
                    reason: format!("row {} has no {}", row + 1, config.label_column),
                })
        })
        .collect::<BenchPlotResult<Vec<_>>>()?;

    let times_ms = times
        .into_iter()
        .map(|raw| {
            config
                .durations
                .apply(raw.unwrap_or(""))
                .map_err(|source| BenchPlotError::DurationError {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect::<BenchPlotResult<Vec<_>>>()?;

    debug!("{}: {:?} -> {:?} ms", name, labels, times_ms);
    BenchmarkRecord::new(name, labels, times_ms)
}

/// Load every file in order; the first failure aborts.
pub fn load_records(paths: &[PathBuf], config: &ReportConfig) -> BenchPlotResult<Vec<BenchmarkRecord>> {
    paths.iter().map(|p| load_record(p, config)).collect()
}
