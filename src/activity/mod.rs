//! Activity input and reporting around the metric engines.
//!
//! Decoders turn a recorded activity into a sequence of [`ActivityRecord`]s:
//! one per 1 Hz tick with optional power and heart-rate readings, plus timer
//! stop markers. The [`ActivityAnalyzer`] feeds them to every engine.

pub mod analyzer;
pub mod fit;
pub mod summary;

pub use analyzer::ActivityAnalyzer;
pub use summary::ActivitySummary;

use crate::metrics::MetricsError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Readings for one tick; either may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    /// Power in watts
    pub power: Option<f64>,
    /// Heart rate in bpm
    pub heart_rate: Option<f64>,
}

impl SensorSample {
    /// A tick carrying both readings.
    pub fn new(power: f64, heart_rate: f64) -> Self {
        Self {
            power: Some(power),
            heart_rate: Some(heart_rate),
        }
    }

    /// A tick carrying power only.
    pub fn power_only(power: f64) -> Self {
        Self {
            power: Some(power),
            heart_rate: None,
        }
    }

    /// A tick carrying heart rate only.
    pub fn heart_rate_only(heart_rate: f64) -> Self {
        Self {
            power: None,
            heart_rate: Some(heart_rate),
        }
    }
}

/// One entry of a decoded activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityRecord {
    /// Sensor readings for one tick
    Sample(SensorSample),
    /// Timer stopped; the next sample starts a new segment
    TimerStop,
}

impl ActivityRecord {
    /// Whether this record marks a stop/pause.
    pub fn is_timer_stop(&self) -> bool {
        matches!(self, ActivityRecord::TimerStop)
    }
}

/// A decoded activity file.
#[derive(Debug, Clone, Default)]
pub struct DecodedActivity {
    /// Timestamp of the first record, if present
    pub start_time: Option<DateTime<Utc>>,
    /// Records in file order
    pub records: Vec<ActivityRecord>,
}

/// Errors while reading or analyzing an activity.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Whether a path looks like a FIT file (case-insensitive extension).
pub fn is_fit_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("fit"))
        .unwrap_or(false)
}

/// List the FIT files directly inside a directory, sorted by path.
pub fn find_fit_files(dir: &Path) -> Result<Vec<PathBuf>, ActivityError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_fit_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    tracing::debug!("Found {} FIT files in {}", files.len(), dir.display());
    Ok(files)
}
