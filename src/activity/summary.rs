//! Activity summary snapshot and its console report.

use crate::metrics::{EfficiencyWindow, StableWindow, WindowPeak};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Peak window for one curve duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Window length in seconds
    pub duration_secs: u32,
    /// Peak value in watts, if the duration was ever filled
    pub peak_watts: Option<f64>,
    /// Sample index where the peak window starts
    pub offset: Option<u64>,
}

impl CurvePoint {
    /// Build from an engine peak record.
    pub fn new(duration_secs: u32, peak: Option<WindowPeak>) -> Self {
        Self {
            duration_secs,
            peak_watts: peak.map(|p| p.value),
            offset: peak.map(|p| p.offset),
        }
    }
}

/// Most stable heart-rate window for one duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityPoint {
    pub duration_secs: u32,
    pub window: Option<StableWindow>,
}

/// Best Efficiency Factor window for one duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyPoint {
    pub duration_secs: u32,
    pub window: Option<EfficiencyWindow>,
}

/// Results of analyzing one activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    /// Timestamp of the first record
    pub start_time: Option<DateTime<Utc>>,
    /// Sample ticks processed
    pub ticks: u64,
    /// Timer-separated segments
    pub segments: u32,
    /// Ticks with a power reading
    pub power_samples: u64,
    /// Ticks with a heart-rate reading
    pub heart_rate_samples: u64,
    /// FTP used for IF and TSS
    pub ftp: f64,
    pub average_power: Option<f64>,
    pub normalized_power: Option<f64>,
    pub intensity_factor: Option<f64>,
    pub training_stress_score: Option<f64>,
    /// Mean maximal power per duration
    pub power_curve: Vec<CurvePoint>,
    /// Peak Normalized Power per duration
    pub normalized_power_curve: Vec<CurvePoint>,
    pub average_heart_rate: Option<f64>,
    /// Minimum-variance heart-rate window per duration
    pub heart_rate_stability: Vec<StabilityPoint>,
    /// Whether any tick carried both power and heart rate
    pub efficiency_has_data: bool,
    /// Heart-rate deviation threshold used for Efficiency Factor
    pub min_heart_rate_std_dev: f64,
    /// Best Efficiency Factor window per duration
    pub efficiency: Vec<EfficiencyPoint>,
}

/// Format an optional value with a fixed precision and unit.
fn opt(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for ActivitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start_time {
            writeln!(f, "Activity start: {}", start.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }
        writeln!(
            f,
            "Samples: {} ({} power, {} heart rate), segments: {}\n",
            self.ticks, self.power_samples, self.heart_rate_samples, self.segments
        )?;

        writeln!(f, "Peak Average Power Curve:\n")?;
        for point in &self.power_curve {
            writeln!(
                f,
                "Duration: {}s, Peak Average Power: {}",
                point.duration_secs,
                opt(point.peak_watts, 0, "W")
            )?;
        }

        writeln!(f, "\nPeak Normalized Power Curve:\n")?;
        for point in &self.normalized_power_curve {
            writeln!(
                f,
                "Duration: {}s, Peak Normalized Power: {}",
                point.duration_secs,
                opt(point.peak_watts, 0, "W")
            )?;
        }

        writeln!(f, "\nMinimum Heart Rate Variance:\n")?;
        for point in &self.heart_rate_stability {
            match &point.window {
                Some(window) => writeln!(
                    f,
                    "Duration: {}s, Average Heart Rate: {:.0}bpm +/- {:.1}",
                    point.duration_secs, window.mean, window.std_dev
                )?,
                None => writeln!(f, "Duration: {}s, no data", point.duration_secs)?,
            }
        }
        writeln!(
            f,
            "Average Heart Rate: {}",
            opt(self.average_heart_rate, 0, "bpm")
        )?;

        writeln!(
            f,
            "\nEfficiency Factor (heart rate std dev < {:.1}):\n",
            self.min_heart_rate_std_dev
        )?;
        if self.efficiency_has_data {
            for point in &self.efficiency {
                match &point.window {
                    Some(window) => writeln!(
                        f,
                        "Duration: {}s, Normalized Power: {:.0}W, Heart Rate: {:.0}bpm +/- {:.1}, EF: {:.2}",
                        point.duration_secs,
                        window.normalized_power,
                        window.mean_heart_rate,
                        window.std_dev,
                        window.efficiency_factor
                    )?,
                    None => writeln!(f, "Duration: {}s, no stable window", point.duration_secs)?,
                }
            }
        } else {
            writeln!(f, "No samples with both power and heart rate")?;
        }

        writeln!(f)?;
        writeln!(f, "Average power: {}", opt(self.average_power, 0, "W"))?;
        writeln!(f, "Normalized power: {}", opt(self.normalized_power, 0, "W"))?;
        writeln!(f, "Intensity factor: {}", opt(self.intensity_factor, 3, ""))?;
        write!(
            f,
            "Training Stress Score: {}",
            opt(self.training_stress_score, 0, "")
        )
    }
}
