//! Four-stage allpass phaser with its own sweep LFO.

use resona_core::{Biquad, Effect, Lfo, allpass_coefficients, flush_denormal};

/// Base center frequencies of the four allpass stages, in Hz.
const STAGE_FREQS: [f32; 4] = [1000.0, 1200.0, 1400.0, 1600.0];

/// Samples between allpass coefficient recomputes.
///
/// The sweep moves at LFO rate (well under 20 Hz), so updating the trig-heavy
/// coefficients every 32nd sample is inaudible while saving most of the work.
const COEFF_UPDATE_INTERVAL: u32 = 32;

/// Phaser built from four cascaded second-order allpass filters.
///
/// A dedicated sine LFO sweeps all four center frequencies synchronously,
/// scaled by the depth in Hz. The feedback parameter sets each stage's Q,
/// sharpening the notches. The stage is fully wet: its output replaces the
/// signal with no dry mix.
#[derive(Debug, Clone)]
pub struct Phaser {
    stages: [Biquad; 4],
    lfo: Lfo,
    rate_hz: f32,
    depth_hz: f32,
    q: f32,
    sample_rate: f32,
    coeff_update_counter: u32,
    last_lfo: f32,
}

impl Phaser {
    /// Create a phaser. Defaults: rate 0.5 Hz, depth 700 Hz, Q 0.5.
    pub fn new(sample_rate: f32) -> Self {
        let mut phaser = Self {
            stages: [Biquad::new(); 4],
            lfo: Lfo::new(sample_rate, 0.5),
            rate_hz: 0.5,
            depth_hz: 700.0,
            q: 0.5,
            sample_rate,
            coeff_update_counter: 1,
            last_lfo: 0.0,
        };
        phaser.update_coefficients();
        phaser
    }

    /// Set the sweep rate in Hz.
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate_hz = rate_hz.clamp(0.0, 20.0);
    }

    /// Current sweep rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate_hz
    }

    /// Set the sweep depth in Hz applied to all four stage centers.
    pub fn set_depth(&mut self, depth_hz: f32) {
        self.depth_hz = depth_hz.max(0.0);
    }

    /// Set the per-stage Q (the phaser's feedback parameter).
    pub fn set_feedback(&mut self, q: f32) {
        self.q = q.clamp(0.01, 30.0);
        self.update_coefficients();
    }

    /// Process one sample with an additive sweep-rate offset in Hz.
    ///
    /// The offset comes from the voice LFO's phaser-rate tap and applies for
    /// this sample only.
    #[inline]
    pub fn process_modulated(&mut self, input: f32, rate_offset_hz: f32) -> f32 {
        self.lfo.set_rate((self.rate_hz + rate_offset_hz).max(0.0));
        self.last_lfo = self.lfo.next();

        self.coeff_update_counter = self.coeff_update_counter.wrapping_sub(1);
        if self.coeff_update_counter == 0 {
            self.coeff_update_counter = COEFF_UPDATE_INTERVAL;
            self.update_coefficients();
        }

        let mut wet = input;
        for stage in &mut self.stages {
            wet = stage.process(wet);
        }
        flush_denormal(wet)
    }

    fn update_coefficients(&mut self) {
        let sweep = self.depth_hz * self.last_lfo;
        for (stage, base) in self.stages.iter_mut().zip(STAGE_FREQS) {
            let freq = (base + sweep).clamp(20.0, self.sample_rate * 0.45);
            stage.set_coefficients(allpass_coefficients(freq, self.q, self.sample_rate));
        }
    }
}

impl Effect for Phaser {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.process_modulated(input, 0.0)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.update_coefficients();
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
        self.lfo.reset();
        self.last_lfo = 0.0;
        self.coeff_update_counter = 1;
        self.update_coefficients();
    }
}
