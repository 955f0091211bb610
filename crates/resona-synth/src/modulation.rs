//! LFO routing: one modulation oscillator fanned out to five destinations.

use resona_core::{Division, Lfo};

use crate::params::SynthParams;

/// Per-sample modulation snapshot consumed by the voice render loop.
///
/// All fields are offsets (or a gain factor for amplitude) already scaled
/// by their routing depth, so the consumer just adds or multiplies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModValues {
    /// Pitch offset in cents.
    pub pitch_cents: f32,
    /// Filter cutoff offset in Hz.
    pub filter_hz: f32,
    /// Tremolo gain factor, exactly 1.0 when the tap is off.
    pub amp_gain: f32,
    /// Phaser sweep rate offset in Hz.
    pub phaser_rate_hz: f32,
    /// Delay time offset in seconds.
    pub delay_secs: f32,
}

impl ModValues {
    /// The no-modulation snapshot.
    pub fn identity() -> Self {
        Self {
            pitch_cents: 0.0,
            filter_hz: 0.0,
            amp_gain: 1.0,
            phaser_rate_hz: 0.0,
            delay_secs: 0.0,
        }
    }
}

/// One LFO and the five routing depths it feeds.
///
/// The LFO rate is either fixed in Hz or derived from the engine tempo via
/// a note division; [`ModRouter::set_bpm`] retunes a synced router in place,
/// keeping the LFO phase so a tempo change never restarts the sweep.
#[derive(Debug, Clone)]
pub struct ModRouter {
    lfo: Option<Lfo>,
    synced: bool,
    division: Division,
    pitch_depth_cents: f32,
    filter_depth_hz: f32,
    amp_depth: f32,
    phaser_rate_depth_hz: f32,
    delay_depth_ms: f32,
}

impl ModRouter {
    /// Build a router from the parameter snapshot.
    pub fn new(params: &SynthParams, sample_rate: f32, bpm: f32) -> Self {
        let lfo = params.lfo_enabled.then(|| {
            let rate = if params.lfo_bpm_sync {
                params.lfo_division.hz(bpm)
            } else {
                params.lfo_rate_hz.max(0.0)
            };
            let mut lfo = Lfo::new(sample_rate, rate);
            lfo.set_waveform(params.lfo_waveform);
            lfo
        });

        Self {
            lfo,
            synced: params.lfo_bpm_sync,
            division: params.lfo_division,
            pitch_depth_cents: params.lfo_to_pitch_cents,
            filter_depth_hz: params.lfo_to_filter_hz,
            amp_depth: params.lfo_to_amplitude,
            phaser_rate_depth_hz: params.lfo_to_phaser_rate,
            delay_depth_ms: params.lfo_to_delay_time,
        }
    }

    /// Retune a tempo-synced LFO. Free-running routers ignore this.
    pub fn set_bpm(&mut self, bpm: f32) {
        if self.synced {
            let rate = self.division.hz(bpm);
            if let Some(lfo) = &mut self.lfo {
                lfo.set_rate(rate);
            }
        }
    }

    /// Current LFO rate in Hz, or `None` when the LFO is disabled.
    pub fn lfo_rate(&self) -> Option<f32> {
        self.lfo.as_ref().map(Lfo::rate)
    }

    /// Tick the LFO once and fan its value out to every destination.
    #[inline]
    pub fn next(&mut self) -> ModValues {
        let Some(lfo) = &mut self.lfo else {
            return ModValues::identity();
        };
        let v = lfo.next();

        ModValues {
            pitch_cents: self.pitch_depth_cents * v,
            filter_hz: self.filter_depth_hz * v,
            // A zero-depth tremolo must be exactly unity, not 1 + 0*v, so
            // rounding can never scale the voice
            amp_gain: if self.amp_depth > 0.0 {
                1.0 + self.amp_depth * v
            } else {
                1.0
            },
            phaser_rate_hz: self.phaser_rate_depth_hz * v,
            // Depth is expressed in milliseconds, the consumer wants seconds
            delay_secs: self.delay_depth_ms * 0.001 * v,
        }
    }
}
