//! Fans activity records out to every metric engine.

use super::summary::{ActivitySummary, CurvePoint, EfficiencyPoint, StabilityPoint};
use super::{ActivityRecord, SensorSample};
use crate::config::AnalysisConfig;
use chrono::{DateTime, Utc};
use crate::metrics::{
    DurationSet, EfficiencyFactorCalculator, HeartRateVarianceCalculator, MetricsResult,
    NormalizedPowerCurveCalculator, PowerCurveCalculator, PowerStatisticsCalculator,
};

/// Runs every engine over one activity.
///
/// Power readings feed the power statistics and both curves, heart-rate
/// readings feed the stability tracker, and ticks carrying both feed the
/// Efficiency Factor. Timer stops reset every engine.
#[derive(Debug, Clone)]
pub struct ActivityAnalyzer {
    power_statistics: PowerStatisticsCalculator,
    power_curve: PowerCurveCalculator,
    normalized_power_curve: NormalizedPowerCurveCalculator,
    heart_rate_variance: HeartRateVarianceCalculator,
    efficiency: EfficiencyFactorCalculator,
    /// Activity start, when the source records one
    start_time: Option<DateTime<Utc>>,
    /// Sample ticks processed
    ticks: u64,
    /// Timer stops seen
    stops: u32,
}

impl ActivityAnalyzer {
    /// Build every engine from the configuration.
    pub fn new(config: &AnalysisConfig) -> MetricsResult<Self> {
        let rolling = config.rolling_window_secs;

        Ok(Self {
            power_statistics: PowerStatisticsCalculator::new(config.ftp, rolling)?,
            power_curve: PowerCurveCalculator::new(DurationSet::new(
                &config.power_curve_durations,
            )?),
            normalized_power_curve: NormalizedPowerCurveCalculator::new(
                DurationSet::new(&config.normalized_power_durations)?,
                rolling,
            )?,
            heart_rate_variance: HeartRateVarianceCalculator::new(DurationSet::new(
                &config.heart_rate_durations,
            )?),
            efficiency: EfficiencyFactorCalculator::new(
                DurationSet::new(&config.efficiency.durations)?,
                config.efficiency.min_heart_rate_std_dev,
                rolling,
                config.efficiency.capture_traces,
            )?,
            start_time: None,
            ticks: 0,
            stops: 0,
        })
    }

    /// Record when the activity started; reported in the summary.
    pub fn set_start_time(&mut self, start_time: Option<DateTime<Utc>>) {
        self.start_time = start_time;
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Process one record.
    pub fn process(&mut self, record: &ActivityRecord) -> MetricsResult<()> {
        match record {
            ActivityRecord::Sample(sample) => self.add_sample(sample),
            ActivityRecord::TimerStop => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Process records in order.
    pub fn process_all<'a, I>(&mut self, records: I) -> MetricsResult<()>
    where
        I: IntoIterator<Item = &'a ActivityRecord>,
    {
        for record in records {
            self.process(record)?;
        }
        Ok(())
    }

    fn add_sample(&mut self, sample: &SensorSample) -> MetricsResult<()> {
        self.ticks += 1;

        if let Some(power) = sample.power {
            self.power_statistics.add(power)?;
            self.power_curve.add(power)?;
            self.normalized_power_curve.add(power)?;
        }
        if let Some(heart_rate) = sample.heart_rate {
            self.heart_rate_variance.add(heart_rate)?;
        }
        if let (Some(power), Some(heart_rate)) = (sample.power, sample.heart_rate) {
            self.efficiency.add(power, heart_rate)?;
        }

        Ok(())
    }

    /// Start a new segment on every engine.
    pub fn reset(&mut self) {
        self.stops += 1;
        tracing::debug!(
            tick = self.ticks,
            segment = self.stops + 1,
            "Timer stop, resetting windows"
        );

        self.power_statistics.reset();
        self.power_curve.reset();
        self.normalized_power_curve.reset();
        self.heart_rate_variance.reset();
        self.efficiency.reset();
    }

    /// Sample ticks processed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of timer-separated segments seen so far.
    pub fn segments(&self) -> u32 {
        self.stops + 1
    }

    pub fn power_statistics(&self) -> &PowerStatisticsCalculator {
        &self.power_statistics
    }

    pub fn power_curve(&self) -> &PowerCurveCalculator {
        &self.power_curve
    }

    pub fn normalized_power_curve(&self) -> &NormalizedPowerCurveCalculator {
        &self.normalized_power_curve
    }

    pub fn heart_rate_variance(&self) -> &HeartRateVarianceCalculator {
        &self.heart_rate_variance
    }

    pub fn efficiency(&self) -> &EfficiencyFactorCalculator {
        &self.efficiency
    }

    /// Snapshot every engine's results.
    pub fn summary(&self) -> ActivitySummary {
        let power_curve = self
            .power_curve
            .durations()
            .iter()
            .zip(self.power_curve.peaks())
            .map(|(duration, peak)| CurvePoint::new(duration, *peak))
            .collect();

        let normalized_power_curve = self
            .normalized_power_curve
            .durations()
            .iter()
            .zip(self.normalized_power_curve.peaks())
            .map(|(duration, peak)| CurvePoint::new(duration, *peak))
            .collect();

        let heart_rate_stability = self
            .heart_rate_variance
            .durations()
            .iter()
            .zip(self.heart_rate_variance.stable_windows())
            .map(|(duration, window)| StabilityPoint {
                duration_secs: duration,
                window: *window,
            })
            .collect();

        let efficiency = self
            .efficiency
            .durations()
            .iter()
            .zip(self.efficiency.windows())
            .map(|(duration, window)| EfficiencyPoint {
                duration_secs: duration,
                window: window.clone(),
            })
            .collect();

        ActivitySummary {
            start_time: self.start_time,
            ticks: self.ticks,
            segments: self.segments(),
            power_samples: self.power_statistics.sample_count(),
            heart_rate_samples: self.heart_rate_variance.sample_count(),
            ftp: self.power_statistics.ftp(),
            average_power: self.power_curve.average_power(),
            normalized_power: self.power_statistics.normalized_power(),
            intensity_factor: self.power_statistics.intensity_factor(),
            training_stress_score: self.power_statistics.training_stress_score(),
            power_curve,
            normalized_power_curve,
            average_heart_rate: self.heart_rate_variance.average_heart_rate(),
            heart_rate_stability,
            efficiency_has_data: self.efficiency.has_data(),
            min_heart_rate_std_dev: self.efficiency.min_std_dev(),
            efficiency,
        }
    }
}
