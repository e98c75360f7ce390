//! Whole-activity power statistics: Normalized Power, Intensity Factor and
//! Training Stress Score.

use crate::metrics::error::{MetricsError, MetricsResult};
use crate::metrics::rolling::{RollingFourthPower, DEFAULT_ROLLING_WINDOW_SECS};

/// Accumulates NP, IF and TSS over an entire activity.
///
/// These are activity-lifetime aggregates, so [`reset`](Self::reset) leaves
/// them untouched.
#[derive(Debug, Clone)]
pub struct PowerStatisticsCalculator {
    /// Functional Threshold Power in watts
    ftp: f64,
    /// Rolling average power raised to the fourth
    rolling: RollingFourthPower,
    /// Sum of every emitted fourth-power value
    fourth_power_total: f64,
    /// Power samples seen
    count: u64,
}

impl PowerStatisticsCalculator {
    /// Create a calculator for the given FTP and NP rolling window.
    pub fn new(ftp: f64, rolling_window: u32) -> MetricsResult<Self> {
        if !(ftp.is_finite() && ftp > 0.0) {
            return Err(MetricsError::InvalidInput(format!(
                "FTP must be a positive number of watts, got {}",
                ftp
            )));
        }

        Ok(Self {
            ftp,
            rolling: RollingFourthPower::new(rolling_window)?,
            fourth_power_total: 0.0,
            count: 0,
        })
    }

    /// Create a calculator using the standard 30-second rolling window.
    pub fn with_ftp(ftp: f64) -> MetricsResult<Self> {
        Self::new(ftp, DEFAULT_ROLLING_WINDOW_SECS)
    }

    /// Add a power sample (watts).
    pub fn add(&mut self, power: f64) -> MetricsResult<()> {
        if let Some(fourth_power) = self.rolling.push(power)? {
            self.fourth_power_total += fourth_power;
        }
        self.count += 1;
        Ok(())
    }

    /// Functional Threshold Power used for IF and TSS.
    pub fn ftp(&self) -> f64 {
        self.ftp
    }

    /// Power samples seen.
    pub fn sample_count(&self) -> u64 {
        self.count
    }

    /// Normalized Power.
    ///
    /// `None` until more samples than the rolling window have been seen.
    pub fn normalized_power(&self) -> Option<f64> {
        let window = u64::from(self.rolling.window());
        if self.count <= window {
            return None;
        }

        let contributing = (self.count - window) as f64;
        Some((self.fourth_power_total / contributing).powf(0.25))
    }

    /// Intensity Factor: NP / FTP.
    pub fn intensity_factor(&self) -> Option<f64> {
        self.normalized_power().map(|np| np / self.ftp)
    }

    /// Training Stress Score.
    ///
    /// TSS = (seconds × NP × IF) / (FTP × 3600) × 100
    pub fn training_stress_score(&self) -> Option<f64> {
        let np = self.normalized_power()?;
        let intensity = np / self.ftp;
        Some((self.count as f64 * np * intensity) / (self.ftp * 3600.0) * 100.0)
    }

    /// Segment boundaries do not affect whole-activity statistics.
    pub fn reset(&mut self) {}
}
