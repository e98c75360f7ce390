//! Efficiency Factor: Normalized Power per heartbeat over stable windows.
//!
//! For each duration, only windows whose heart-rate standard deviation stays
//! below a threshold are eligible. Among eligible windows the one with the
//! highest Normalized Power wins, and EF = NP / mean heart rate.

use crate::metrics::error::{MetricsError, MetricsResult};
use crate::metrics::rolling::RollingFourthPower;
use crate::metrics::variance::VarianceWindows;
use crate::metrics::window::{DurationSet, WindowSums};
use serde::{Deserialize, Serialize};

/// Winning window for one duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyWindow {
    /// Normalized Power over the window (watts)
    pub normalized_power: f64,
    /// Mean heart rate over the window (bpm)
    pub mean_heart_rate: f64,
    /// Heart-rate standard deviation over the window
    pub std_dev: f64,
    /// NP / mean heart rate
    pub efficiency_factor: f64,
    /// Sample index at which the window starts
    pub offset: u64,
    /// Heart-rate samples of the window, when trace capture is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_trace: Option<Vec<f64>>,
}

/// Segment-scoped accumulators, cleared on reset.
#[derive(Debug, Clone)]
struct EfficiencySegment {
    /// Rolling-average^4 derivation of power
    rolling: RollingFourthPower,
    /// Per-duration sums of the rolling^4 series
    fourth_power: WindowSums,
    /// Per-duration heart-rate mean/variance sums
    heart_rate: VarianceWindows,
}

impl EfficiencySegment {
    fn reset(&mut self) {
        self.rolling.reset();
        self.fourth_power.reset();
        self.heart_rate.reset();
    }
}

/// Activity-lifetime records; survive resets.
#[derive(Debug, Clone)]
struct EfficiencyRecords {
    /// Best window per duration
    windows: Vec<Option<EfficiencyWindow>>,
    /// Sum of heart-rate samples
    heart_rate_total: f64,
    /// Sample pairs seen
    count: u64,
}

/// Tracks the best Efficiency Factor window per duration.
#[derive(Debug, Clone)]
pub struct EfficiencyFactorCalculator {
    /// Maximum heart-rate standard deviation for an eligible window
    min_std_dev: f64,
    /// Copy winning heart-rate windows
    capture_traces: bool,
    segment: EfficiencySegment,
    records: EfficiencyRecords,
}

impl EfficiencyFactorCalculator {
    /// Create a calculator.
    ///
    /// `min_std_dev` is the heart-rate standard deviation a window must stay
    /// strictly below to be considered.
    pub fn new(
        durations: DurationSet,
        min_std_dev: f64,
        rolling_window: u32,
        capture_traces: bool,
    ) -> MetricsResult<Self> {
        if !(min_std_dev.is_finite() && min_std_dev > 0.0) {
            return Err(MetricsError::InvalidInput(format!(
                "heart-rate deviation threshold must be positive, got {}",
                min_std_dev
            )));
        }

        let records = EfficiencyRecords {
            windows: vec![None; durations.len()],
            heart_rate_total: 0.0,
            count: 0,
        };
        let segment = EfficiencySegment {
            rolling: RollingFourthPower::new(rolling_window)?,
            fourth_power: WindowSums::new(durations.clone()),
            heart_rate: VarianceWindows::new(durations),
        };

        Ok(Self {
            min_std_dev,
            capture_traces,
            segment,
            records,
        })
    }

    /// Add a simultaneous power (watts) and heart-rate (bpm) sample.
    pub fn add(&mut self, power: f64, heart_rate: f64) -> MetricsResult<()> {
        self.records.count += 1;
        self.records.heart_rate_total += heart_rate;

        if let Some(fourth_power) = self.segment.rolling.push(power)? {
            self.segment.fourth_power.push(fourth_power)?;
        }
        self.segment.heart_rate.push(heart_rate)?;

        let count = self.records.count;
        for stats in self.segment.heart_rate.warm_stats() {
            let std_dev = stats.variance.sqrt();
            if std_dev >= self.min_std_dev || stats.mean <= 0.0 {
                continue;
            }
            if !self.segment.fourth_power.is_warm(stats.index) {
                continue;
            }

            let duration = f64::from(stats.duration);
            let normalized_power =
                (self.segment.fourth_power.sum(stats.index) / duration).powf(0.25);

            let slot = &mut self.records.windows[stats.index];
            if slot
                .as_ref()
                .is_some_and(|best| normalized_power <= best.normalized_power)
            {
                continue;
            }

            let heart_rate_trace = if self.capture_traces {
                Some(self.segment.heart_rate.capture(stats.index)?)
            } else {
                None
            };
            let offset = count - u64::from(stats.duration);
            tracing::trace!(
                duration = stats.duration,
                normalized_power,
                mean_heart_rate = stats.mean,
                offset,
                "New efficiency window"
            );

            *slot = Some(EfficiencyWindow {
                normalized_power,
                mean_heart_rate: stats.mean,
                std_dev,
                efficiency_factor: normalized_power / stats.mean,
                offset,
                heart_rate_trace,
            });
        }

        Ok(())
    }

    /// Whether any sample pair has been observed.
    pub fn has_data(&self) -> bool {
        self.records.count > 0
    }

    /// Durations tracked.
    pub fn durations(&self) -> &DurationSet {
        self.segment.heart_rate.durations()
    }

    /// Heart-rate deviation threshold.
    pub fn min_std_dev(&self) -> f64 {
        self.min_std_dev
    }

    /// Best window per duration, in duration-set order.
    pub fn windows(&self) -> &[Option<EfficiencyWindow>] {
        &self.records.windows
    }

    /// Best window for a specific duration.
    pub fn window_for(&self, duration: u32) -> Option<&EfficiencyWindow> {
        let index = self.durations().iter().position(|d| d == duration)?;
        self.records.windows[index].as_ref()
    }

    /// Average heart rate over every pair, across resets.
    pub fn average_heart_rate(&self) -> Option<f64> {
        if self.records.count == 0 {
            None
        } else {
            Some(self.records.heart_rate_total / self.records.count as f64)
        }
    }

    /// Sample pairs seen.
    pub fn sample_count(&self) -> u64 {
        self.records.count
    }

    /// Clear every running sum and buffer; records persist.
    pub fn reset(&mut self) {
        self.segment.reset();
    }
}
