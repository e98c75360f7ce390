//! Sliding-window running sums over a set of durations.
//!
//! One ring buffer sized to the longest duration serves every window: each
//! new sample is added to every running sum and the sample leaving each
//! window is subtracted, read back from the buffer at `duration - 1`. The
//! per-sample cost is proportional to the number of durations, never to
//! their length.

use crate::metrics::buffer::RingSampleBuffer;
use crate::metrics::error::{MetricsError, MetricsResult};

/// Ordered set of window lengths, in samples (seconds at 1 Hz).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationSet {
    durations: Vec<u32>,
}

impl DurationSet {
    /// Create a duration set, preserving the caller's order.
    ///
    /// Fails if the list is empty or contains a zero duration.
    pub fn new(durations: &[u32]) -> MetricsResult<Self> {
        if durations.is_empty() {
            return Err(MetricsError::InvalidInput(
                "duration set must not be empty".to_string(),
            ));
        }
        if durations.contains(&0) {
            return Err(MetricsError::InvalidInput(
                "durations must be at least one sample".to_string(),
            ));
        }

        Ok(Self {
            durations: durations.to_vec(),
        })
    }

    /// Durations in caller order.
    pub fn as_slice(&self) -> &[u32] {
        &self.durations
    }

    /// Iterate over the durations.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.durations.iter().copied()
    }

    /// Number of durations.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Always false for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// The longest duration in the set.
    pub fn longest(&self) -> u32 {
        self.durations.iter().copied().max().unwrap_or(1)
    }
}

/// Average of one warmed-up window after the latest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverage {
    /// Position of the duration in its set
    pub index: usize,
    /// Window length in samples
    pub duration: u32,
    /// Mean of the last `duration` samples
    pub average: f64,
}

/// Running sum of the last `D` samples for every `D` in a duration set.
///
/// This is segment-scoped state: `reset` clears sums, history and the warm-up
/// count, so windows never straddle a reset.
#[derive(Debug, Clone)]
pub struct WindowSums {
    /// Window lengths
    durations: DurationSet,
    /// Running sum per duration
    sums: Vec<f64>,
    /// Shared history, longest duration + 1 samples
    buffer: RingSampleBuffer,
    /// Samples pushed since construction or the last reset
    count: u64,
}

impl WindowSums {
    /// Create zeroed sums for the given durations.
    pub fn new(durations: DurationSet) -> Self {
        let capacity = durations.longest() as usize + 1;
        Self {
            sums: vec![0.0; durations.len()],
            buffer: RingSampleBuffer::new(capacity),
            durations,
            count: 0,
        }
    }

    /// Slide every window forward by one sample.
    pub fn push(&mut self, value: f64) -> MetricsResult<()> {
        for (sum, duration) in self.sums.iter_mut().zip(self.durations.iter()) {
            let expiring = self.buffer.read_negative_offset(duration as usize - 1)?;
            *sum += value - expiring;
        }

        self.buffer.add(value);
        self.count += 1;
        Ok(())
    }

    /// The durations these sums cover.
    pub fn durations(&self) -> &DurationSet {
        &self.durations
    }

    /// Samples pushed since construction or the last reset.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running sum for the duration at `index`.
    pub fn sum(&self, index: usize) -> f64 {
        self.sums[index]
    }

    /// Whether the window at `index` is full of real samples.
    pub fn is_warm(&self, index: usize) -> bool {
        self.count >= u64::from(self.durations.as_slice()[index])
    }

    /// Mean of the window at `index`, once warmed up.
    pub fn average(&self, index: usize) -> Option<f64> {
        if !self.is_warm(index) {
            return None;
        }
        let duration = self.durations.as_slice()[index];
        Some(self.sums[index] / f64::from(duration))
    }

    /// Averages of every warmed-up window.
    pub fn warm_averages(&self) -> impl Iterator<Item = WindowAverage> + '_ {
        self.durations
            .iter()
            .enumerate()
            .filter(move |&(_, duration)| self.count >= u64::from(duration))
            .map(move |(index, duration)| WindowAverage {
                index,
                duration,
                average: self.sums[index] / f64::from(duration),
            })
    }

    /// Copy the samples currently inside the window at `index`, oldest first.
    pub fn capture(&self, index: usize) -> MetricsResult<Vec<f64>> {
        let duration = self.durations.as_slice()[index];
        self.buffer.capture_window(duration as usize)
    }

    /// The most recently pushed sample.
    pub fn latest(&self) -> f64 {
        self.buffer.current_element()
    }

    /// Clear sums, history and warm-up count.
    pub fn reset(&mut self) {
        self.sums.fill(0.0);
        self.buffer.reset();
        self.count = 0;
    }
}
