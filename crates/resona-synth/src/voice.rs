//! One sounding note: oscillators, noise, filter, envelopes, modulation,
//! and the per-voice effect stages.

use resona_core::{
    Biquad, Coefficients, Division, Effect, NoiseSource, bandpass_coefficients, cents_to_ratio,
    highpass_coefficients, lowpass_coefficients, midi_to_freq, notch_coefficients,
    semitones_to_ratio,
};
use resona_effects::{Distortion, FeedbackDelay, Phaser};

use crate::envelope::{Envelope, EnvelopeSegments};
use crate::modulation::ModRouter;
use crate::oscillator::Oscillator;
use crate::params::{FilterType, SynthParams};

/// Seconds a stopped voice keeps ringing past its longest release ramp,
/// letting the delay and phaser tails fade.
const STOP_TAIL_SECONDS: f32 = 0.1;

/// Samples between voice-filter coefficient recomputes.
///
/// The cutoff moves at envelope/LFO speed; recomputing the trig-heavy
/// coefficients every 16th sample tracks it closely enough.
const FILTER_UPDATE_INTERVAL: u32 = 16;

/// Upper cutoff bound in Hz.
const CUTOFF_MAX_HZ: f32 = 20000.0;

/// Lower cutoff bound in Hz.
const CUTOFF_MIN_HZ: f32 = 20.0;

/// Voice lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    /// Constructed, nothing rendered yet.
    Starting,
    /// Producing audio, note held.
    Sounding,
    /// Note released, ringing out the release tail.
    Releasing,
    /// Tail elapsed; ready to be reaped.
    Done,
}

/// A single note, from note-on to reap.
///
/// The voice owns every piece of its DSP state by value. It is built in one
/// shot from a [`SynthParams`] snapshot, renders per sample against the
/// engine clock, and is dropped once [`Voice::is_done`] reports true. A
/// voice is never retriggered; playing the same pitch again builds a fresh
/// voice.
#[derive(Debug)]
pub struct Voice {
    pitch: u8,
    state: VoiceState,
    sample_rate: f32,

    osc1: Oscillator,
    osc1_detune_ratio: f32,
    osc2: Option<Oscillator>,
    osc2_detune_ratio: f32,
    osc2_mix: f32,
    phase_mod_depth: f32,

    noise: Option<NoiseSource>,
    noise_level: f32,

    filter: Biquad,
    filter_type: FilterType,
    filter_q: f32,
    filter_update_counter: u32,

    amp_env: Envelope,
    filter_env: Envelope,
    pitch_env: Envelope,
    router: ModRouter,

    distortion: Option<Distortion>,
    phaser: Option<Phaser>,
    delay: Option<FeedbackDelay>,
    delay_synced: bool,
    delay_division: Division,

    amp_release_secs: f32,
    filter_release_secs: f32,
    stop_at: u64,
}

impl Voice {
    /// Build a voice for `pitch` at `velocity` from the parameter snapshot.
    ///
    /// This is the only allocating step of a voice's life (noise and delay
    /// buffers); rendering afterwards never allocates.
    pub fn new(
        pitch: u8,
        velocity: u8,
        params: &SynthParams,
        sample_rate: f32,
        bpm: f32,
        master_volume: f32,
    ) -> Self {
        let base_freq = if params.fixed_pitch_enabled {
            params.fixed_frequency_hz.max(0.0)
        } else {
            midi_to_freq(pitch)
        };

        let osc1_detune_ratio = cents_to_ratio(params.osc1_detune_cents);
        let osc2_detune_ratio = cents_to_ratio(params.osc2_detune_cents);

        let osc1 = Oscillator::new(
            sample_rate,
            base_freq * osc1_detune_ratio,
            params.osc1_waveform,
        );
        let osc2 = params.osc2_enabled.then(|| {
            Oscillator::new(
                sample_rate,
                base_freq * osc2_detune_ratio,
                params.osc2_waveform,
            )
        });

        let noise = params.noise_enabled.then(|| {
            // Seed from the note identity so every voice gets its own
            // deterministic buffer
            let seed = (u32::from(pitch) << 16) ^ (u32::from(velocity) << 8) ^ 0xa511_e9b3;
            NoiseSource::new(params.noise_type, sample_rate, seed)
        });

        let amp_peak = master_volume.clamp(0.0, 1.0) * f32::from(velocity.min(127)) / 127.0;
        let mut amp_env = Envelope::new(sample_rate);
        amp_env.trigger(EnvelopeSegments {
            start: 0.0,
            peak: amp_peak,
            sustain: amp_peak * params.amp_sustain.clamp(0.0, 1.0),
            base: 0.0,
            attack_secs: params.amp_attack,
            decay_secs: params.amp_decay,
            release_secs: params.amp_release,
        });

        let base_cutoff = params.filter_cutoff_hz.clamp(CUTOFF_MIN_HZ, CUTOFF_MAX_HZ);
        let cutoff_peak =
            (base_cutoff * (1.0 + params.filter_env_amount.max(0.0))).min(CUTOFF_MAX_HZ);
        let mut filter_env = Envelope::new(sample_rate);
        filter_env.trigger(EnvelopeSegments {
            start: base_cutoff,
            peak: cutoff_peak,
            sustain: base_cutoff
                + (cutoff_peak - base_cutoff) * params.filter_env_sustain.clamp(0.0, 1.0),
            base: base_cutoff,
            attack_secs: params.filter_env_attack,
            // The decay shares the amplitude envelope's decay time so the
            // brightness falls in step with the loudness
            decay_secs: params.amp_decay,
            release_secs: params.filter_env_release,
        });

        // The pitch envelope runs in absolute Hz. Start and peak coincide so
        // the attack segment is flat; only the decay sweeps. It is never
        // released: the pitch holds its sustain value through note release.
        let pitch_peak = base_freq * semitones_to_ratio(params.pitch_env_amount);
        let pitch_sustain = base_freq
            * semitones_to_ratio(params.pitch_env_amount * params.pitch_env_sustain);
        let mut pitch_env = Envelope::new(sample_rate);
        pitch_env.trigger(EnvelopeSegments {
            start: pitch_peak,
            peak: pitch_peak,
            sustain: pitch_sustain,
            base: base_freq,
            attack_secs: params.pitch_env_attack,
            decay_secs: params.pitch_env_decay,
            release_secs: params.pitch_env_release,
        });

        let distortion = params.distortion_enabled.then(|| {
            let mut dist = Distortion::new(sample_rate);
            dist.set_amount(params.distortion_amount);
            dist.set_output_gain(params.distortion_output_gain);
            dist
        });

        let phaser = params.phaser_enabled.then(|| {
            let mut phaser = Phaser::new(sample_rate);
            phaser.set_rate(params.phaser_rate_hz);
            phaser.set_depth(params.phaser_depth_hz);
            phaser.set_feedback(params.phaser_feedback);
            phaser
        });

        let delay = params.delay_enabled.then(|| {
            let mut delay = FeedbackDelay::new(sample_rate);
            let seconds = if params.delay_bpm_sync {
                params.delay_division.seconds(bpm)
            } else {
                params.delay_time_secs
            };
            delay.set_time_secs(seconds);
            delay.set_feedback(params.delay_feedback);
            delay.set_wet(params.delay_wet);
            delay
        });

        let mut voice = Self {
            pitch,
            state: VoiceState::Starting,
            sample_rate,
            osc1,
            osc1_detune_ratio,
            osc2,
            osc2_detune_ratio,
            osc2_mix: params.osc2_mix.clamp(0.0, 1.0),
            phase_mod_depth: params.osc2_phase_mod_depth,
            noise,
            noise_level: params.noise_level.clamp(0.0, 1.0),
            filter: Biquad::new(),
            filter_type: params.filter_type,
            filter_q: params.filter_resonance.max(0.01),
            filter_update_counter: 1,
            amp_env,
            filter_env,
            pitch_env,
            router: ModRouter::new(params, sample_rate, bpm),
            distortion,
            phaser,
            delay,
            delay_synced: params.delay_bpm_sync,
            delay_division: params.delay_division,
            amp_release_secs: params.amp_release.max(0.0),
            filter_release_secs: params.filter_env_release.max(0.0),
            stop_at: u64::MAX,
        };
        voice.update_filter(base_cutoff);
        voice
    }

    /// Render one sample against the engine clock `now`.
    #[inline]
    pub fn render(&mut self, now: u64) -> f32 {
        match self.state {
            VoiceState::Done => return 0.0,
            VoiceState::Starting => self.state = VoiceState::Sounding,
            VoiceState::Releasing if now >= self.stop_at => {
                self.state = VoiceState::Done;
                return 0.0;
            }
            _ => {}
        }

        let mods = self.router.next();

        let hz = self.pitch_env.advance() * cents_to_ratio(mods.pitch_cents);
        self.osc1.set_frequency(hz * self.osc1_detune_ratio);

        let mut sample = if let Some(osc2) = &mut self.osc2 {
            osc2.set_frequency(hz * self.osc2_detune_ratio);
            let s2 = osc2.advance();
            let s1 = self.osc1.advance_with_pm(s2 * self.phase_mod_depth);
            s1 + s2 * self.osc2_mix
        } else {
            self.osc1.advance()
        };

        if let Some(noise) = &mut self.noise {
            sample += noise.next() * self.noise_level;
        }

        let cutoff = (self.filter_env.advance() + mods.filter_hz)
            .clamp(CUTOFF_MIN_HZ, CUTOFF_MAX_HZ);
        self.filter_update_counter = self.filter_update_counter.wrapping_sub(1);
        if self.filter_update_counter == 0 {
            self.filter_update_counter = FILTER_UPDATE_INTERVAL;
            self.update_filter(cutoff);
        }
        sample = self.filter.process(sample);

        sample *= self.amp_env.advance() * mods.amp_gain;

        if let Some(dist) = &mut self.distortion {
            sample = dist.process(sample);
        }
        if let Some(phaser) = &mut self.phaser {
            sample = phaser.process_modulated(sample, mods.phaser_rate_hz);
        }
        if let Some(delay) = &mut self.delay {
            sample = delay.process_modulated(sample, mods.delay_secs);
        }

        sample
    }

    /// Release the note.
    ///
    /// Idempotent. The amplitude and filter envelopes start their release
    /// ramps from their current values, the noise source goes silent
    /// immediately, and the voice keeps rendering until the longest release
    /// plus a fixed tail has elapsed on the engine clock.
    pub fn stop(&mut self, now: u64) {
        if matches!(self.state, VoiceState::Releasing | VoiceState::Done) {
            return;
        }
        self.amp_env.release();
        self.filter_env.release();
        self.noise = None;

        let tail = self.amp_release_secs.max(self.filter_release_secs) + STOP_TAIL_SECONDS;
        self.stop_at = now + (tail * self.sample_rate) as u64;
        self.state = VoiceState::Releasing;
    }

    /// Propagate a tempo change to the synced LFO and delay, in place.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.router.set_bpm(bpm);
        if self.delay_synced {
            if let Some(delay) = &mut self.delay {
                delay.set_time_secs(self.delay_division.seconds(bpm));
            }
        }
    }

    /// The MIDI pitch this voice was started with.
    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    /// Current lifecycle state.
    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// True once the release tail has fully elapsed.
    pub fn is_done(&self) -> bool {
        self.state == VoiceState::Done
    }

    /// Current amplitude envelope value.
    pub fn amplitude(&self) -> f32 {
        self.amp_env.value()
    }

    /// Current modulation LFO rate in Hz, if the LFO is enabled.
    pub fn lfo_rate(&self) -> Option<f32> {
        self.router.lfo_rate()
    }

    fn update_filter(&mut self, cutoff: f32) {
        let coeffs: Coefficients = match self.filter_type {
            FilterType::LowPass => lowpass_coefficients(cutoff, self.filter_q, self.sample_rate),
            FilterType::HighPass => highpass_coefficients(cutoff, self.filter_q, self.sample_rate),
            FilterType::BandPass => bandpass_coefficients(cutoff, self.filter_q, self.sample_rate),
            FilterType::Notch => notch_coefficients(cutoff, self.filter_q, self.sample_rate),
        };
        self.filter.set_coefficients(coeffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeStage;
    use resona_core::LfoWaveform;

    const SR: f32 = 48000.0;
    const BPM: f32 = 120.0;

    fn render_secs(voice: &mut Voice, clock: &mut u64, seconds: f32) -> alloc::vec::Vec<f32> {
        let n = (seconds * SR) as usize;
        let mut out = alloc::vec::Vec::with_capacity(n);
        for _ in 0..n {
            out.push(voice.render(*clock));
            *clock += 1;
        }
        out
    }

    #[test]
    fn starting_becomes_sounding_on_first_sample() {
        let params = SynthParams::default();
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        assert_eq!(voice.state(), VoiceState::Starting);
        voice.render(0);
        assert_eq!(voice.state(), VoiceState::Sounding);
    }

    #[test]
    fn sustained_voice_reaches_expected_amplitude() {
        let params = SynthParams::default();
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        // Past attack + decay, into sustain
        render_secs(&mut voice, &mut clock, 0.3);
        let expected = (100.0 / 127.0) * params.amp_sustain;
        assert!((voice.amplitude() - expected).abs() < 1e-3);
    }

    #[test]
    fn master_volume_scales_the_peak() {
        let params = SynthParams::default();
        let mut voice = Voice::new(60, 127, &params, SR, BPM, 0.5);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.3);
        assert!((voice.amplitude() - 0.5 * params.amp_sustain).abs() < 1e-3);
    }

    #[test]
    fn stop_rings_out_then_finishes() {
        let params = SynthParams::default();
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.3);

        voice.stop(clock);
        assert_eq!(voice.state(), VoiceState::Releasing);

        // Still audible right after release
        let early = render_secs(&mut voice, &mut clock, 0.05);
        assert!(early.iter().any(|s| s.abs() > 1e-4));

        // amp_release 0.3 + 0.1 tail: gone by 0.5 s after the stop
        render_secs(&mut voice, &mut clock, 0.45);
        assert!(voice.is_done());
        assert_eq!(voice.render(clock), 0.0);
    }

    #[test]
    fn stop_is_idempotent() {
        let params = SynthParams::default();
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.2);

        voice.stop(clock);
        let stop_at = voice.stop_at;
        render_secs(&mut voice, &mut clock, 0.05);
        voice.stop(clock);
        assert_eq!(voice.stop_at, stop_at, "second stop must not extend the tail");
    }

    #[test]
    fn noise_halts_immediately_on_stop() {
        let params = SynthParams {
            noise_enabled: true,
            noise_level: 1.0,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        assert!(voice.noise.is_some());
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.1);
        voice.stop(clock);
        assert!(voice.noise.is_none());
    }

    #[test]
    fn fixed_pitch_overrides_midi_pitch() {
        let params = SynthParams {
            fixed_pitch_enabled: true,
            fixed_frequency_hz: 100.0,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.2);
        assert!((voice.osc1.frequency() - 100.0).abs() < 0.5);
    }

    #[test]
    fn filter_envelope_reuses_amp_decay_time() {
        // Long filter decay, short amp decay: the cutoff must land on its
        // sustain value on the amp decay's schedule.
        let params = SynthParams {
            amp_attack: 0.0,
            amp_decay: 0.05,
            filter_env_attack: 0.0,
            filter_env_decay: 5.0,
            filter_env_amount: 1.0,
            filter_cutoff_hz: 1000.0,
            filter_env_sustain: 0.5,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(60, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.06);
        assert_eq!(voice.filter_env.stage(), EnvelopeStage::Sustain);
        assert!((voice.filter_env.value() - 1500.0).abs() < 1.0);
    }

    #[test]
    fn pitch_envelope_holds_through_release() {
        let params = SynthParams {
            pitch_env_amount: 12.0,
            pitch_env_sustain: 1.0,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(69, 100, &params, SR, BPM, 1.0);
        let mut clock = 0;
        render_secs(&mut voice, &mut clock, 0.2);
        voice.stop(clock);
        render_secs(&mut voice, &mut clock, 0.2);
        // An octave up from A4, unchanged by the release
        assert!((voice.pitch_env.value() - 880.0).abs() < 1.0);
    }

    #[test]
    fn tempo_change_retunes_synced_delay() {
        let params = SynthParams {
            delay_enabled: true,
            delay_bpm_sync: true,
            delay_division: Division::Eighth,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(60, 100, &params, SR, 120.0, 1.0);
        voice.set_bpm(240.0);
        let time = voice.delay.as_ref().map(FeedbackDelay::time_secs);
        // An eighth at 240 BPM is 125 ms
        assert!((time.unwrap() - 0.125).abs() < 1e-4);
    }

    #[test]
    fn tremolo_modulates_output_level() {
        let params = SynthParams {
            lfo_enabled: true,
            lfo_waveform: LfoWaveform::Sine,
            lfo_rate_hz: 8.0,
            lfo_to_amplitude: 0.9,
            amp_attack: 0.0,
            amp_decay: 0.0,
            amp_sustain: 1.0,
            ..SynthParams::default()
        };
        let mut trem = Voice::new(60, 127, &params, SR, BPM, 1.0);
        let flat_params = SynthParams {
            lfo_enabled: false,
            ..params
        };
        let mut flat = Voice::new(60, 127, &flat_params, SR, BPM, 1.0);

        let mut clock = 0;
        let a = render_secs(&mut trem, &mut clock, 0.5);
        let mut clock = 0;
        let b = render_secs(&mut flat, &mut clock, 0.5);

        // The tremolo voice's envelope of |sample| should swing much wider
        let spread = |xs: &[f32]| {
            let peaks: alloc::vec::Vec<f32> = xs
                .chunks(512)
                .map(|c| c.iter().fold(0.0f32, |m, s| m.max(s.abs())))
                .collect();
            let max = peaks.iter().fold(0.0f32, |m, &p| m.max(p));
            let min = peaks.iter().fold(f32::MAX, |m, &p| m.min(p));
            max - min
        };
        assert!(spread(&a) > spread(&b) + 0.2);
    }

    #[test]
    fn full_chain_renders_finite_audio() {
        let params = SynthParams {
            osc2_enabled: true,
            osc2_phase_mod_depth: 2.0,
            noise_enabled: true,
            lfo_enabled: true,
            lfo_to_pitch_cents: 25.0,
            lfo_to_filter_hz: 500.0,
            lfo_to_phaser_rate: 2.0,
            lfo_to_delay_time: 5.0,
            distortion_enabled: true,
            phaser_enabled: true,
            delay_enabled: true,
            ..SynthParams::default()
        };
        let mut voice = Voice::new(48, 110, &params, SR, BPM, 0.8);
        let mut clock = 0;
        let out = render_secs(&mut voice, &mut clock, 0.5);
        assert!(out.iter().all(|s| s.is_finite()));
        assert!(out.iter().any(|s| s.abs() > 1e-4));
    }
}
