//! Peak sliding-window curves.
//!
//! A curve tracks, for every duration in its set, the best window metric seen
//! so far and where that window started. The same engine drives the mean
//! maximal power curve (metric = window average) and the normalized power
//! curve (metric = 4th root of the windowed mean of rolling-average-power^4).

use crate::metrics::error::MetricsResult;
use crate::metrics::rolling::RollingFourthPower;
use crate::metrics::window::{DurationSet, WindowSums};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Maps a window's mean to the value being maximised.
pub trait WindowMetric {
    /// Metric for a window with the given mean.
    fn metric(window_average: f64) -> f64;
}

/// Plain window average (mean maximal power).
#[derive(Debug, Clone, Copy, Default)]
pub struct AveragePower;

impl WindowMetric for AveragePower {
    fn metric(window_average: f64) -> f64 {
        window_average
    }
}

/// Fourth root of the window average, for series already raised to the fourth.
#[derive(Debug, Clone, Copy, Default)]
pub struct FourthRootMean;

impl WindowMetric for FourthRootMean {
    fn metric(window_average: f64) -> f64 {
        window_average.powf(0.25)
    }
}

/// Best window observed for one duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPeak {
    /// Metric value of the winning window
    pub value: f64,
    /// Sample index at which the winning window starts
    pub offset: u64,
}

/// Activity-lifetime state of a curve; survives resets.
#[derive(Debug, Clone)]
struct PeakRecords {
    /// Best window per duration, `None` until the duration first warms up
    peaks: Vec<Option<WindowPeak>>,
    /// Sum of every input sample
    total: f64,
    /// Input samples seen
    count: u64,
}

/// Best-window tracker over a duration set, generic over the window metric.
#[derive(Debug, Clone)]
pub struct PeakWindowCurve<M: WindowMetric> {
    /// Segment-scoped running sums
    windows: WindowSums,
    /// Lifetime peaks and totals
    records: PeakRecords,
    _metric: PhantomData<M>,
}

/// Mean maximal power per duration.
pub type PowerCurveCalculator = PeakWindowCurve<AveragePower>;

impl<M: WindowMetric> PeakWindowCurve<M> {
    /// Create an empty curve over the given durations.
    pub fn new(durations: DurationSet) -> Self {
        let records = PeakRecords {
            peaks: vec![None; durations.len()],
            total: 0.0,
            count: 0,
        };

        Self {
            windows: WindowSums::new(durations),
            records,
            _metric: PhantomData,
        }
    }

    /// Add one sample and update any improved peaks.
    pub fn add(&mut self, value: f64) -> MetricsResult<()> {
        self.windows.push(value)?;
        self.records.total += value;
        self.records.count += 1;

        let count = self.records.count;
        for window in self.windows.warm_averages() {
            let metric = M::metric(window.average);
            let slot = &mut self.records.peaks[window.index];

            // Strictly better only: ties keep the earliest window
            if slot.is_none_or(|peak| metric > peak.value) {
                let offset = count - u64::from(window.duration);
                tracing::trace!(
                    duration = window.duration,
                    value = metric,
                    offset,
                    "New peak window"
                );
                *slot = Some(WindowPeak {
                    value: metric,
                    offset,
                });
            }
        }

        Ok(())
    }

    /// Durations tracked by this curve.
    pub fn durations(&self) -> &DurationSet {
        self.windows.durations()
    }

    /// Best window per duration, in duration-set order.
    pub fn peaks(&self) -> &[Option<WindowPeak>] {
        &self.records.peaks
    }

    /// Best window for a specific duration, if tracked and observed.
    pub fn peak_for(&self, duration: u32) -> Option<WindowPeak> {
        let index = self.durations().iter().position(|d| d == duration)?;
        self.records.peaks[index]
    }

    /// Samples seen over the curve's lifetime.
    pub fn sample_count(&self) -> u64 {
        self.records.count
    }

    /// Clear running sums and history; peaks and totals persist.
    pub fn reset(&mut self) {
        self.windows.reset();
    }
}

impl PeakWindowCurve<AveragePower> {
    /// Lifetime average power, `None` before the first sample.
    pub fn average_power(&self) -> Option<f64> {
        if self.records.count == 0 {
            None
        } else {
            Some(self.records.total / self.records.count as f64)
        }
    }
}

/// Peak Normalized Power per duration.
///
/// Raw power is turned into the rolling-average^4 series first; peak windows
/// and their offsets are expressed in samples of that derived series.
#[derive(Debug, Clone)]
pub struct NormalizedPowerCurveCalculator {
    /// Rolling-average^4 derivation
    rolling: RollingFourthPower,
    /// Peak tracking over the derived series
    curve: PeakWindowCurve<FourthRootMean>,
}

impl NormalizedPowerCurveCalculator {
    /// Create a curve with the given NP rolling window.
    pub fn new(durations: DurationSet, rolling_window: u32) -> MetricsResult<Self> {
        Ok(Self {
            rolling: RollingFourthPower::new(rolling_window)?,
            curve: PeakWindowCurve::new(durations),
        })
    }

    /// Add a raw power sample (watts).
    pub fn add(&mut self, power: f64) -> MetricsResult<()> {
        if let Some(fourth_power) = self.rolling.push(power)? {
            self.curve.add(fourth_power)?;
        }
        Ok(())
    }

    /// Durations tracked by this curve.
    pub fn durations(&self) -> &DurationSet {
        self.curve.durations()
    }

    /// Peak NP window per duration, in duration-set order.
    pub fn peaks(&self) -> &[Option<WindowPeak>] {
        self.curve.peaks()
    }

    /// Peak NP window for a specific duration.
    pub fn peak_for(&self, duration: u32) -> Option<WindowPeak> {
        self.curve.peak_for(duration)
    }

    /// Derived samples contributed so far.
    pub fn sample_count(&self) -> u64 {
        self.curve.sample_count()
    }

    /// Clear rolling and window history; peaks persist.
    pub fn reset(&mut self) {
        self.rolling.reset();
        self.curve.reset();
    }
}
