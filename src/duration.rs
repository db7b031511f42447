//! Wall-clock duration strings as written by the benchmark harness.
//!
//! Two shapes are recognized: `"<seconds>s"` and `"<minutes>m<seconds>s"`.
//! Both components are non-negative decimals, optionally with an exponent. Values are converted to
//! milliseconds once, at load time.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

// Non-negative decimal with an optional exponent ("90", "1.5", ".5", "1e1").
const NUMBER: &str = r"(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?";

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:(?P<min>{NUMBER})\s*m\s*)?(?P<sec>{NUMBER})\s*s\s*$"
    ))
    .expect("duration pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("unrecognized duration {0:?}")]
    Unrecognized(String),
}

/// How to treat duration strings that match neither recognized shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Unrecognized values count as zero milliseconds.
    #[default]
    Lenient,
    /// Unrecognized values are an error.
    Strict,
}

impl DurationPolicy {
    pub fn apply(self, raw: &str) -> Result<f64, DurationError> {
        match (parse_duration_ms(raw), self) {
            (Ok(ms), _) => Ok(ms),
            (Err(err), DurationPolicy::Strict) => Err(err),
            (Err(_), DurationPolicy::Lenient) => {
                warn!("Unrecognized duration {:?}, counting it as 0 ms", raw);
                Ok(0.0)
            }
        }
    }
}

/// Parse `"45s"` or `"1m30s"` into milliseconds.
pub fn parse_duration_ms(raw: &str) -> Result<f64, DurationError> {
    let unrecognized = || DurationError::Unrecognized(raw.to_string());
    let caps = DURATION_RE.captures(raw).ok_or_else(unrecognized)?;

    let seconds: f64 = caps["sec"].parse().map_err(|_| unrecognized())?;
    let minutes: f64 = match caps.name("min") {
        Some(m) => m.as_str().parse().map_err(|_| unrecognized())?,
        None => 0.0,
    };

    let ms = (minutes * 60.0 + seconds) * 1000.0;
    if !ms.is_finite() {
        return Err(unrecognized());
    }
    Ok(ms)
}
