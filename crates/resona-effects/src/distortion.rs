//! Waveshaping distortion.

use core::f32::consts::PI;
use resona_core::{Effect, SmoothedParam};

/// Degrees-to-radians constant baked into the transfer curve.
const DEG: f32 = PI / 180.0;

/// Closed-form waveshaper with a drive amount and an output gain.
///
/// The transfer function is
///
/// ```text
/// y = ((3 + k) * x * 20 * c) / (pi + k * |x|)
/// ```
///
/// with `k` the drive amount and `c = pi/180`. Evaluated per sample rather
/// than through a pre-tabulated curve; the closed form is exact at every
/// input value and costs one divide.
#[derive(Debug, Clone)]
pub struct Distortion {
    amount: SmoothedParam,
    output_gain: SmoothedParam,
}

impl Distortion {
    /// Create a distortion stage. Defaults: amount 20, output gain 0.5.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            amount: SmoothedParam::with_config(20.0, sample_rate, 5.0),
            output_gain: SmoothedParam::with_config(0.5, sample_rate, 5.0),
        }
    }

    /// Set the drive amount `k`. Negative values are clamped to zero.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount.set_target(amount.max(0.0));
    }

    /// Current drive amount.
    pub fn amount(&self) -> f32 {
        self.amount.target()
    }

    /// Set the post-shaper output gain.
    pub fn set_output_gain(&mut self, gain: f32) {
        self.output_gain.set_target(gain.max(0.0));
    }

    /// Current output gain.
    pub fn output_gain(&self) -> f32 {
        self.output_gain.target()
    }

    #[inline]
    fn shape(x: f32, k: f32) -> f32 {
        ((3.0 + k) * x * 20.0 * DEG) / (PI + k * x.abs())
    }
}

impl Effect for Distortion {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let k = self.amount.advance();
        let gain = self.output_gain.advance();
        Self::shape(input, k) * gain
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.amount.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.amount.snap_to_target();
        self.output_gain.snap_to_target();
    }
}
