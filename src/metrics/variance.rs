//! Heart-rate stability: minimum-variance windows per duration.
//!
//! Variance is computed in one pass from parallel running sums of the value
//! and of its square: `var = |E[x²] − E[x]²|`. The absolute value only
//! absorbs floating-point residue around zero.

use crate::metrics::error::MetricsResult;
use crate::metrics::window::{DurationSet, WindowSums};
use serde::{Deserialize, Serialize};

/// Mean and variance of one warmed-up window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Position of the duration in its set
    pub index: usize,
    /// Window length in samples
    pub duration: u32,
    /// Window mean
    pub mean: f64,
    /// Window (population) variance
    pub variance: f64,
}

/// Running sums of values and squared values over a duration set.
#[derive(Debug, Clone)]
pub struct VarianceWindows {
    values: WindowSums,
    squares: WindowSums,
}

impl VarianceWindows {
    /// Create zeroed windows for the given durations.
    pub fn new(durations: DurationSet) -> Self {
        Self {
            values: WindowSums::new(durations.clone()),
            squares: WindowSums::new(durations),
        }
    }

    /// Slide every window forward by one sample.
    pub fn push(&mut self, value: f64) -> MetricsResult<()> {
        self.values.push(value)?;
        self.squares.push(value * value)
    }

    /// The durations covered.
    pub fn durations(&self) -> &DurationSet {
        self.values.durations()
    }

    /// Mean and variance for every warmed-up window.
    pub fn warm_stats(&self) -> impl Iterator<Item = WindowStats> + '_ {
        self.values.warm_averages().map(move |window| {
            let mean_square = self.squares.sum(window.index) / f64::from(window.duration);
            WindowStats {
                index: window.index,
                duration: window.duration,
                mean: window.average,
                variance: (mean_square - window.average * window.average).abs(),
            }
        })
    }

    /// Raw samples inside the window at `index`, oldest first.
    pub fn capture(&self, index: usize) -> MetricsResult<Vec<f64>> {
        self.values.capture(index)
    }

    /// Clear both sets of sums and their history.
    pub fn reset(&mut self) {
        self.values.reset();
        self.squares.reset();
    }
}

/// Most stable window observed for one duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StableWindow {
    /// Mean value over the window
    pub mean: f64,
    /// Standard deviation over the window
    pub std_dev: f64,
    /// Variance over the window
    pub variance: f64,
    /// Sample index at which the window starts
    pub offset: u64,
}

/// Activity-lifetime state; survives resets.
#[derive(Debug, Clone)]
struct StabilityRecords {
    /// Minimum-variance window per duration
    windows: Vec<Option<StableWindow>>,
    /// Sum of all heart-rate samples
    total: f64,
    /// Heart-rate samples seen
    count: u64,
}

/// Tracks the minimum-variance heart-rate window for each duration.
#[derive(Debug, Clone)]
pub struct HeartRateVarianceCalculator {
    /// Segment-scoped running sums
    windows: VarianceWindows,
    /// Lifetime records and averages
    records: StabilityRecords,
}

impl HeartRateVarianceCalculator {
    /// Create a calculator over the given durations.
    pub fn new(durations: DurationSet) -> Self {
        let records = StabilityRecords {
            windows: vec![None; durations.len()],
            total: 0.0,
            count: 0,
        };

        Self {
            windows: VarianceWindows::new(durations),
            records,
        }
    }

    /// Add a heart-rate sample (bpm).
    pub fn add(&mut self, heart_rate: f64) -> MetricsResult<()> {
        self.windows.push(heart_rate)?;
        self.records.total += heart_rate;
        self.records.count += 1;

        let count = self.records.count;
        for stats in self.windows.warm_stats() {
            let slot = &mut self.records.windows[stats.index];
            if slot.is_none_or(|best| stats.variance < best.variance) {
                let offset = count - u64::from(stats.duration);
                tracing::trace!(
                    duration = stats.duration,
                    variance = stats.variance,
                    offset,
                    "New minimum-variance window"
                );
                *slot = Some(StableWindow {
                    mean: stats.mean,
                    std_dev: stats.variance.sqrt(),
                    variance: stats.variance,
                    offset,
                });
            }
        }

        Ok(())
    }

    /// Durations tracked.
    pub fn durations(&self) -> &DurationSet {
        self.windows.durations()
    }

    /// Most stable window per duration, in duration-set order.
    pub fn stable_windows(&self) -> &[Option<StableWindow>] {
        &self.records.windows
    }

    /// Most stable window for a specific duration.
    pub fn stable_window_for(&self, duration: u32) -> Option<StableWindow> {
        let index = self.durations().iter().position(|d| d == duration)?;
        self.records.windows[index]
    }

    /// Average heart rate over every sample, across resets.
    pub fn average_heart_rate(&self) -> Option<f64> {
        if self.records.count == 0 {
            None
        } else {
            Some(self.records.total / self.records.count as f64)
        }
    }

    /// Heart-rate samples seen.
    pub fn sample_count(&self) -> u64 {
        self.records.count
    }

    /// Clear running sums; records and lifetime average persist.
    pub fn reset(&mut self) {
        self.windows.reset();
    }
}
