//! PolyBLEP oscillator with a phase-modulation input.
//!
//! Sawtooth and square use the two-sample polynomial band-limited step
//! correction; triangle is the leaky integral of the corrected square, and
//! sine needs no correction. The phase-modulation input shifts the read
//! phase only, so modulation never detunes the free-running frequency.

use core::f32::consts::TAU;
use libm::sinf;

use crate::params::Waveform;

/// Two-sample polynomial correction around a step discontinuity at phase 0.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

/// A single band-limited oscillator voice component.
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: Waveform,
    // Leaky integrator state for the triangle shape
    tri_state: f32,
}

impl Oscillator {
    /// Create an oscillator at `frequency_hz`.
    pub fn new(sample_rate: f32, frequency_hz: f32, waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            phase_inc: frequency_hz.max(0.0) / sample_rate,
            sample_rate,
            waveform,
            tri_state: 0.0,
        }
    }

    /// Retune without resetting phase.
    #[inline]
    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.phase_inc = frequency_hz.max(0.0) / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Update the sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }

    /// Rewind phase and integrator state.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.tri_state = 0.0;
    }

    /// Produce the next sample and advance phase.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.advance_with_pm(0.0)
    }

    /// Produce the next sample with `phase_mod` radians added to the read
    /// phase, then advance. The modulation shifts where the waveform is
    /// read this sample without affecting the running frequency.
    #[inline]
    pub fn advance_with_pm(&mut self, phase_mod: f32) -> f32 {
        let dt = self.phase_inc;
        let t = wrap_unit(self.phase + phase_mod / TAU);

        let output = match self.waveform {
            Waveform::Sine => sinf(t * TAU),
            Waveform::Sawtooth => 2.0 * t - 1.0 - poly_blep(t, dt),
            Waveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, dt) - poly_blep(wrap_unit(t + 0.5), dt)
            }
            Waveform::Triangle => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                let square = naive + poly_blep(t, dt) - poly_blep(wrap_unit(t + 0.5), dt);
                // Leaky-integrate the square into a triangle. The 4*dt slope
                // scale keeps the peak near unity across the audible range.
                self.tri_state = 4.0 * dt * square + (1.0 - 4.0 * dt) * self.tri_state;
                self.tri_state
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        output
    }
}

/// Wrap into [0, 1), tolerating negative phase-modulation offsets.
#[inline]
fn wrap_unit(t: f32) -> f32 {
    let wrapped = t - libm::floorf(t);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
