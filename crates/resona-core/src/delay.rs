//! Circular-buffer delay line with fractional read positions.

use alloc::vec;
use alloc::vec::Vec;

/// A heap-allocated delay line supporting fractional delay times.
///
/// Reads interpolate linearly between adjacent samples so a modulated delay
/// time (tempo changes, LFO wobble) stays free of stair-step artifacts. The
/// buffer is allocated once at construction and never grows; writes and
/// reads are allocation-free.
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Create a delay line holding at most `max_delay_samples` samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is zero.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "delay capacity must be > 0");
        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Create a delay line sized for `max_seconds` at `sample_rate`.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Read the sample `delay_samples` ticks in the past (fractional).
    ///
    /// The delay is clamped to the buffer capacity.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let clamped = delay_samples.clamp(0.0, (len - 1) as f32);
        let whole = clamped as usize;
        let frac = clamped - whole as f32;

        // Sample `whole` ticks before the most recent write.
        let pos = (self.write_pos + len - whole - 1) % len;
        let next = (pos + len - 1) % len;

        let a = self.buffer[pos];
        let b = self.buffer[next];
        a + (b - a) * frac
    }

    /// Push a sample, advancing the write head.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the buffer and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
