//! Rolling-average fourth-power series behind Normalized Power.
//!
//! NP = 4th root of the mean of (rolling average power)^4. The rolling
//! average only contributes once more than `window` samples have been seen,
//! so the first full window is used purely as warm-up.

use crate::metrics::error::{MetricsError, MetricsResult};
use crate::metrics::window::{DurationSet, WindowSums};

/// Standard rolling window for Normalized Power, in seconds.
pub const DEFAULT_ROLLING_WINDOW_SECS: u32 = 30;

/// Turns a power stream into its rolling-average-to-the-fourth series.
#[derive(Debug, Clone)]
pub struct RollingFourthPower {
    /// Rolling window length
    window: u32,
    /// Single-duration running sum over raw power
    sums: WindowSums,
}

impl RollingFourthPower {
    /// Create a calculator with the given rolling window length.
    pub fn new(window: u32) -> MetricsResult<Self> {
        if window == 0 {
            return Err(MetricsError::InvalidInput(
                "rolling window must be at least one sample".to_string(),
            ));
        }

        Ok(Self {
            window,
            sums: WindowSums::new(DurationSet::new(&[window])?),
        })
    }

    /// Rolling window length in samples.
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Power samples pushed since construction or the last reset.
    pub fn count(&self) -> u64 {
        self.sums.count()
    }

    /// Add a power sample.
    ///
    /// Returns the rolling average raised to the fourth power once warm-up is
    /// complete, `None` before that.
    pub fn push(&mut self, power: f64) -> MetricsResult<Option<f64>> {
        self.sums.push(power)?;

        if self.sums.count() <= u64::from(self.window) {
            return Ok(None);
        }

        let rolling_average = self.sums.sum(0) / f64::from(self.window);
        Ok(Some(rolling_average.powi(4)))
    }

    /// Clear rolling history.
    pub fn reset(&mut self) {
        self.sums.reset();
    }
}
