//! Parameter smoothing to keep control changes zipper-free.

use libm::expf;

/// A control value smoothed by a one-pole lowpass.
///
/// Stages read the smoothed value once per sample with
/// [`advance`](Self::advance); control code moves the target with
/// [`set_target`](Self::set_target) at any time. The time constant is the
/// time to cover ~63% of a step.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    smoothing_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter.
    ///
    /// A `smoothing_ms` of zero disables smoothing (instant changes).
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Set the value the parameter glides toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set the value and jump to it with no glide.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Advance one sample and return the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value, without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// The target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump the smoothed value onto the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Update the sample rate, keeping the smoothing time.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    // coeff = 1 - exp(-1 / (tau * sr)); tau=0 means instant.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}
