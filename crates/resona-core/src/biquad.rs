//! Second-order IIR filter and the standard coefficient recipes.
//!
//! The voice filter and the phaser's allpass stages are both built on
//! [`Biquad`]. Coefficient functions follow the Audio EQ Cookbook
//! (R. Bristow-Johnson) formulations.

use core::f32::consts::TAU;
use libm::{cosf, sinf};

/// Coefficient set `(b0, b1, b2, a0, a1, a2)` for a biquad section.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// A single biquad section in transposed direct form II.
///
/// State is two floats; coefficients are stored pre-normalized by `a0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    s1: f32,
    s2: f32,
}

impl Biquad {
    /// Create a pass-through section (unity gain, no state).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            ..Self::default()
        }
    }

    /// Install raw coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        let inv_a0 = 1.0 / a0;
        self.b0 = b0 * inv_a0;
        self.b1 = b1 * inv_a0;
        self.b2 = b2 * inv_a0;
        self.a1 = a1 * inv_a0;
        self.a2 = a2 * inv_a0;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.s1;
        self.s1 = self.b1 * input - self.a1 * output + self.s2;
        self.s2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Clear filter history without touching coefficients.
    pub fn clear(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

// Shared prologue for the cookbook recipes. Frequency is clamped below
// Nyquist so tan/sin never blow up on hostile parameter values.
#[inline]
fn omega(frequency: f32, sample_rate: f32) -> (f32, f32, f32) {
    let freq = frequency.clamp(1.0, sample_rate * 0.49);
    let w0 = TAU * freq / sample_rate;
    (w0, cosf(w0), sinf(w0))
}

/// Lowpass coefficients at `frequency` Hz with resonance `q`.
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q.max(0.01));
    let b1 = 1.0 - cos_w0;
    let b0 = b1 * 0.5;
    (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
}

/// Highpass coefficients at `frequency` Hz with resonance `q`.
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q.max(0.01));
    let b0 = (1.0 + cos_w0) * 0.5;
    (
        b0,
        -(1.0 + cos_w0),
        b0,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

/// Bandpass coefficients (constant 0 dB peak gain).
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q.max(0.01));
    (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
}

/// Notch coefficients at `frequency` Hz.
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q.max(0.01));
    (
        1.0,
        -2.0 * cos_w0,
        1.0,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

/// Allpass coefficients at `frequency` Hz. Unity magnitude everywhere,
/// 180 degrees of phase shift at the center frequency.
pub fn allpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q.max(0.01));
    (
        1.0 - alpha,
        -2.0 * cos_w0,
        1.0 + alpha,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut Biquad, input: impl Iterator<Item = f32>) -> f32 {
        let mut last = 0.0;
        for x in input {
            last = filter.process(x);
        }
        last
    }

    #[test]
    fn passthrough_by_default() {
        let mut filter = Biquad::new();
        assert_eq!(filter.process(0.7), 0.7);
        assert_eq!(filter.process(-0.3), -0.3);
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = Biquad::new();
        filter.set_coefficients(lowpass_coefficients(1000.0, 0.707, 48000.0));
        let settled = run(&mut filter, core::iter::repeat(1.0).take(4800));
        assert!((settled - 1.0).abs() < 0.01, "DC gain should be ~1, got {settled}");
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = Biquad::new();
        filter.set_coefficients(highpass_coefficients(1000.0, 0.707, 48000.0));
        let settled = run(&mut filter, core::iter::repeat(1.0).take(48000));
        assert!(settled.abs() < 0.01, "DC should be rejected, got {settled}");
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let sr = 48000.0;
        let mut filter = Biquad::new();
        filter.set_coefficients(lowpass_coefficients(500.0, 0.707, sr));

        // 8 kHz sine, well above the 500 Hz cutoff
        let mut peak: f32 = 0.0;
        for n in 0..48000 {
            let x = sinf(TAU * 8000.0 * n as f32 / sr);
            let y = filter.process(x);
            if n > 24000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.05, "expected strong attenuation, peak {peak}");
    }

    #[test]
    fn allpass_preserves_magnitude() {
        let sr = 48000.0;
        let mut filter = Biquad::new();
        filter.set_coefficients(allpass_coefficients(1000.0, 0.5, sr));

        let mut in_energy = 0.0f64;
        let mut out_energy = 0.0f64;
        for n in 0..48000 {
            let x = sinf(TAU * 1000.0 * n as f32 / sr);
            let y = filter.process(x);
            if n > 4800 {
                in_energy += f64::from(x * x);
                out_energy += f64::from(y * y);
            }
        }
        let ratio = out_energy / in_energy;
        assert!((ratio - 1.0).abs() < 0.02, "allpass energy ratio {ratio}");
    }

    #[test]
    fn hostile_frequency_is_clamped() {
        let mut filter = Biquad::new();
        filter.set_coefficients(lowpass_coefficients(1e9, 0.707, 48000.0));
        for _ in 0..1000 {
            assert!(filter.process(1.0).is_finite());
        }
    }
}
