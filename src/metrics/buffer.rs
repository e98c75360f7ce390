//! Fixed-capacity circular sample storage.
//!
//! The buffer keeps the most recent `capacity` samples and answers
//! "what was written `k` samples ago" in O(1). Every sliding-window engine
//! uses it to retire the sample leaving its window.

use crate::metrics::error::{MetricsError, MetricsResult};

/// Circular store of the most recent samples.
///
/// Offset 0 is always the most recent write. Slots that have not yet been
/// written read back as zero.
#[derive(Debug, Clone)]
pub struct RingSampleBuffer {
    /// Backing storage
    elements: Vec<f64>,
    /// Slot holding the most recent write
    position: usize,
}

impl RingSampleBuffer {
    /// Create a zero-filled buffer holding `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be at least 1");
        Self {
            elements: vec![0.0; capacity],
            position: capacity - 1,
        }
    }

    /// Number of samples the buffer retains.
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Write a sample into the next slot, overwriting the oldest one.
    pub fn add(&mut self, sample: f64) {
        self.position = (self.position + 1) % self.elements.len();
        self.elements[self.position] = sample;
    }

    /// Read the sample written `offset` writes before the most recent one.
    pub fn read_negative_offset(&self, offset: usize) -> MetricsResult<f64> {
        let capacity = self.capacity();
        if offset >= capacity {
            return Err(MetricsError::OutOfRange { offset, capacity });
        }

        let index = (self.position + capacity - offset) % capacity;
        Ok(self.elements[index])
    }

    /// Copy the last `count` samples, oldest first.
    pub fn capture_window(&self, count: usize) -> MetricsResult<Vec<f64>> {
        let capacity = self.capacity();
        if count > capacity {
            return Err(MetricsError::OutOfRange {
                offset: count,
                capacity,
            });
        }

        let start = (self.position + 1 + capacity - count) % capacity;
        let end = start + count;
        if end <= capacity {
            return Ok(self.elements[start..end].to_vec());
        }

        // Window wraps past the end of the backing storage
        let mut window = Vec::with_capacity(count);
        window.extend_from_slice(&self.elements[start..]);
        window.extend_from_slice(&self.elements[..end - capacity]);
        Ok(window)
    }

    /// Zero every slot and rewind the cursor. Capacity is unchanged.
    pub fn reset(&mut self) {
        self.elements.fill(0.0);
        self.position = self.elements.len() - 1;
    }

    /// The most recently added sample.
    pub fn current_element(&self) -> f64 {
        self.elements[self.position]
    }

    /// Raw slot contents in storage order.
    pub fn elements(&self) -> &[f64] {
        &self.elements
    }
}
