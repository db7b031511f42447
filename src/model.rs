//! Benchmark records and the validated set the charts are drawn from.

use crate::errors::{BenchPlotError, BenchPlotResult};
use serde::Serialize;
use std::path::Path;

/// Timings of one benchmark, one entry per optimization mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    name: String,
    labels: Vec<String>,
    times_ms: Vec<f64>,
}

impl BenchmarkRecord {
    pub fn new(
        name: impl Into<String>,
        labels: Vec<String>,
        times_ms: Vec<f64>,
    ) -> BenchPlotResult<Self> {
        let name = name.into();
        if labels.len() != times_ms.len() {
            return Err(BenchPlotError::InvalidRecord {
                path: Path::new(&name).to_path_buf(),
                reason: format!(
                    "{} labels but {} times",
                    labels.len(),
                    times_ms.len()
                ),
            });
        }
        Ok(Self {
            name,
            labels,
            times_ms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn times_ms(&self) -> &[f64] {
        &self.times_ms
    }

    pub fn time_of(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.times_ms[i])
    }

    /// Reorder the timings to follow `modes`. Fails if the record does not
    /// carry exactly those modes.
    fn aligned_to(&self, modes: &[String]) -> BenchPlotResult<Vec<f64>> {
        let mismatch = || BenchPlotError::InconsistentModes {
            benchmark: self.name.clone(),
            expected: modes.to_vec(),
            found: self.labels.clone(),
        };
        if self.labels.len() != modes.len() {
            return Err(mismatch());
        }
        modes
            .iter()
            .map(|mode| self.time_of(mode).ok_or_else(mismatch))
            .collect()
    }
}

/// Records that agree on their modes, with the baseline resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSet {
    modes: Vec<String>,
    baseline: usize,
    names: Vec<String>,
    // times[benchmark][mode], mode order follows `modes`
    times: Vec<Vec<f64>>,
}

impl BenchmarkSet {
    /// Validate `records` and resolve the baseline mode.
    ///
    /// The mode order is taken from the first record. Other records may list
    /// their modes in any order but must carry the same set. Without an
    /// explicit `baseline` label the first mode is the baseline.
    pub fn new(records: Vec<BenchmarkRecord>, baseline: Option<&str>) -> BenchPlotResult<Self> {
        let first = records.first().ok_or_else(|| {
            BenchPlotError::Unknown(anyhow::anyhow!("No benchmark records to plot"))
        })?;
        let modes = first.labels.clone();
        if modes.is_empty() {
            return Err(BenchPlotError::InvalidRecord {
                path: first.name.clone().into(),
                reason: "no optimization modes".to_string(),
            });
        }
        if let Some(dup) = modes
            .iter()
            .enumerate()
            .find(|(i, m)| modes[..*i].contains(*m))
            .map(|(_, m)| m)
        {
            return Err(BenchPlotError::InvalidRecord {
                path: first.name.clone().into(),
                reason: format!("mode {dup:?} listed twice"),
            });
        }

        let baseline = match baseline {
            Some(label) => modes.iter().position(|m| m == label).ok_or_else(|| {
                BenchPlotError::MissingBaseline {
                    baseline: label.to_string(),
                    modes: modes.clone(),
                }
            })?,
            None => 0,
        };

        let times = records
            .iter()
            .map(|r| r.aligned_to(&modes))
            .collect::<BenchPlotResult<Vec<_>>>()?;
        let names = records.into_iter().map(|r| r.name).collect();

        Ok(Self {
            modes,
            baseline,
            names,
            times,
        })
    }

    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn baseline_label(&self) -> &str {
        &self.modes[self.baseline]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Time of `mode` for every benchmark, in benchmark order.
    pub fn mode_times(&self, mode: usize) -> Vec<f64> {
        self.times.iter().map(|row| row[mode]).collect()
    }
}
