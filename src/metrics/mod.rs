//! Streaming sliding-window metrics over 1 Hz power and heart-rate samples.
//!
//! Every engine shares one technique: a ring buffer plus a running sum per
//! duration, so each sample costs O(number of durations). Engines split their
//! state into segment accumulators, cleared by `reset`, and lifetime records
//! (peaks, minimum-variance windows, activity averages) that are not.

pub mod buffer;
pub mod curve;
pub mod efficiency;
pub mod error;
pub mod power;
pub mod rolling;
pub mod variance;
pub mod window;

pub use buffer::RingSampleBuffer;
pub use curve::{
    AveragePower, FourthRootMean, NormalizedPowerCurveCalculator, PeakWindowCurve,
    PowerCurveCalculator, WindowMetric, WindowPeak,
};
pub use efficiency::{EfficiencyFactorCalculator, EfficiencyWindow};
pub use error::{MetricsError, MetricsResult};
pub use power::PowerStatisticsCalculator;
pub use rolling::{RollingFourthPower, DEFAULT_ROLLING_WINDOW_SECS};
pub use variance::{HeartRateVarianceCalculator, StableWindow, VarianceWindows, WindowStats};
pub use window::{DurationSet, WindowAverage, WindowSums};
