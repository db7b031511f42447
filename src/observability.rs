use crate::compute::ChartData;
use crate::errors::BenchPlotResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    #[serde(skip)]
    start_time: Instant,
    pub files_read: usize,
    pub rows_read: usize,
    pub step_durations_ms: BTreeMap<String, u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_read: 0,
            rows_read: 0,
            step_durations_ms: BTreeMap::new(),
        }
    }

    pub fn record_step(&mut self, step_name: &str, duration: Duration) {
        self.step_durations_ms
            .insert(step_name.to_string(), duration.as_millis() as u64);
    }

    /// Run `f` and record how long it took under `step_name`.
    pub fn time_step<T>(&mut self, step_name: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record_step(step_name, start.elapsed());
        out
    }

    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct InputFileStats {
    pub path: PathBuf,
    pub hash: String, // SHA256 hex
    pub size_bytes: u64,
}

impl InputFileStats {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            path: path.to_path_buf(),
            hash: compute_file_hash(path)?,
            size_bytes: std::fs::metadata(path)?.len(),
        })
    }
}

/// Everything a run produced, for reproducing or diffing reports.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub inputs: Vec<InputFileStats>,
    pub charts: &'a [PathBuf],
    pub absolute: &'a ChartData,
    pub normalized: &'a ChartData,
    pub metrics: &'a Metrics,
}

impl RunSummary<'_> {
    pub fn write<P: AsRef<Path>>(&self, path: P) -> BenchPlotResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        std::fs::write(path, json)?;
        info!("Run summary written to {:?}", path);
        Ok(())
    }
}

pub fn compute_file_hash<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192]; // 8KB buffer

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
