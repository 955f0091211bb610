//! Low-frequency oscillator used as a modulation source.

use core::f32::consts::TAU;
use libm::sinf;

/// LFO waveform shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LfoWaveform {
    /// Smooth sinusoidal sweep.
    #[default]
    Sine,
    /// Linear up/down ramps.
    Triangle,
    /// Rising ramp with an abrupt reset.
    Sawtooth,
    /// Hard on/off switching.
    Square,
}

/// Phase-accumulator LFO producing values in [-1, 1].
///
/// Rate changes take effect on the next sample and keep the current phase,
/// so a tempo change retunes a running LFO without a restart.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    sample_rate: f32,
    waveform: LfoWaveform,
}

impl Lfo {
    /// Create an LFO at `rate_hz`.
    pub fn new(sample_rate: f32, rate_hz: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: rate_hz / sample_rate,
            sample_rate,
            waveform: LfoWaveform::Sine,
        }
    }

    /// Set the rate in Hz. Phase is preserved.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.phase_inc = rate_hz.max(0.0) / self.sample_rate;
    }

    /// Current rate in Hz.
    pub fn rate(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Select the waveform shape.
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Rewind phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Update the sample rate, keeping the rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let rate = self.rate();
        self.sample_rate = sample_rate;
        self.set_rate(rate);
    }

    /// Produce the next value and advance phase.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let output = match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * TAU),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoWaveform::Sawtooth => 2.0 * self.phase - 1.0,
            LfoWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        output
    }
}
