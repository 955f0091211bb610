//! The flat parameter record a voice is built from.

use resona_core::{Division, LfoWaveform, NoiseType};

/// Oscillator waveform shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Waveform {
    /// Pure tone, no harmonics.
    Sine,
    /// Odd harmonics, hollow character.
    Square,
    /// All harmonics, the classic subtractive starting point.
    #[default]
    Sawtooth,
    /// Odd harmonics with steep rolloff, soft character.
    Triangle,
}

/// Voice filter response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterType {
    /// Pass below cutoff.
    #[default]
    LowPass,
    /// Pass above cutoff.
    HighPass,
    /// Pass a band around cutoff.
    BandPass,
    /// Reject a band around cutoff.
    Notch,
}

/// Complete sound description for one note.
///
/// A plain record of scalars and enums, cheap to copy and snapshot. Each
/// voice captures the values it needs at note-on; later edits only affect
/// future notes. Out-of-range values are clamped where they are used, so
/// any combination of fields is safe to play.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynthParams {
    /// Primary oscillator shape.
    pub osc1_waveform: Waveform,
    /// Primary oscillator detune in cents.
    pub osc1_detune_cents: f32,

    /// Whether the second oscillator runs at all.
    pub osc2_enabled: bool,
    /// Second oscillator shape.
    pub osc2_waveform: Waveform,
    /// Second oscillator detune in cents.
    pub osc2_detune_cents: f32,
    /// Level at which osc2 is mixed into the voice output.
    pub osc2_mix: f32,
    /// Phase modulation of osc1 by osc2, in radians at full osc2 swing.
    pub osc2_phase_mod_depth: f32,

    /// Whether the noise source runs.
    pub noise_enabled: bool,
    /// Noise mix level.
    pub noise_level: f32,
    /// Noise color.
    pub noise_type: NoiseType,

    /// Ignore the MIDI pitch and use `fixed_frequency_hz` instead.
    pub fixed_pitch_enabled: bool,
    /// Oscillator frequency when fixed pitch is on.
    pub fixed_frequency_hz: f32,

    /// Amplitude attack time in seconds.
    pub amp_attack: f32,
    /// Amplitude decay time in seconds.
    pub amp_decay: f32,
    /// Amplitude sustain level, 0 to 1 of the attack peak.
    pub amp_sustain: f32,
    /// Amplitude release time in seconds.
    pub amp_release: f32,

    /// Pitch envelope attack time in seconds.
    pub pitch_env_attack: f32,
    /// Pitch envelope decay time in seconds.
    pub pitch_env_decay: f32,
    /// Pitch envelope sustain, 0 to 1 of the full excursion.
    pub pitch_env_sustain: f32,
    /// Pitch envelope release time in seconds.
    pub pitch_env_release: f32,
    /// Pitch envelope excursion in semitones.
    pub pitch_env_amount: f32,

    /// Filter response shape.
    pub filter_type: FilterType,
    /// Base filter cutoff in Hz.
    pub filter_cutoff_hz: f32,
    /// Filter resonance (biquad Q).
    pub filter_resonance: f32,

    /// Filter envelope attack time in seconds.
    pub filter_env_attack: f32,
    /// Filter envelope decay time in seconds.
    pub filter_env_decay: f32,
    /// Filter envelope sustain, 0 to 1 of the excursion above base.
    pub filter_env_sustain: f32,
    /// Filter envelope release time in seconds.
    pub filter_env_release: f32,
    /// Filter envelope excursion as a multiplier of the base cutoff.
    pub filter_env_amount: f32,

    /// Whether the modulation LFO runs.
    pub lfo_enabled: bool,
    /// Modulation LFO shape.
    pub lfo_waveform: LfoWaveform,
    /// Free-running LFO rate in Hz.
    pub lfo_rate_hz: f32,
    /// Derive the LFO rate from the engine tempo instead of `lfo_rate_hz`.
    pub lfo_bpm_sync: bool,
    /// Note division used when `lfo_bpm_sync` is on.
    pub lfo_division: Division,
    /// LFO to pitch depth in cents.
    pub lfo_to_pitch_cents: f32,
    /// LFO to filter cutoff depth in Hz.
    pub lfo_to_filter_hz: f32,
    /// LFO tremolo depth, 0 to 1.
    pub lfo_to_amplitude: f32,
    /// LFO to phaser sweep rate depth in Hz.
    pub lfo_to_phaser_rate: f32,
    /// LFO to delay time depth in milliseconds.
    pub lfo_to_delay_time: f32,

    /// Whether the distortion stage runs.
    pub distortion_enabled: bool,
    /// Distortion drive.
    pub distortion_amount: f32,
    /// Gain applied after the waveshaper.
    pub distortion_output_gain: f32,

    /// Whether the delay stage runs.
    pub delay_enabled: bool,
    /// Free-running delay time in seconds.
    pub delay_time_secs: f32,
    /// Derive the delay time from the engine tempo instead of seconds.
    pub delay_bpm_sync: bool,
    /// Note division used when `delay_bpm_sync` is on.
    pub delay_division: Division,
    /// Delay feedback, clamped to [0, 0.95] at the stage.
    pub delay_feedback: f32,
    /// Delay wet mix, 0 to 1.
    pub delay_wet: f32,

    /// Whether the phaser stage runs.
    pub phaser_enabled: bool,
    /// Phaser sweep rate in Hz.
    pub phaser_rate_hz: f32,
    /// Phaser sweep depth in Hz.
    pub phaser_depth_hz: f32,
    /// Phaser allpass sharpness (Q).
    pub phaser_feedback: f32,

    /// Overall output level, 0 to 1, baked into each voice's amp peak.
    pub master_volume: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            osc1_waveform: Waveform::Sawtooth,
            osc1_detune_cents: 0.0,

            osc2_enabled: false,
            osc2_waveform: Waveform::Square,
            osc2_detune_cents: 0.0,
            osc2_mix: 0.5,
            osc2_phase_mod_depth: 0.0,

            noise_enabled: false,
            noise_level: 0.2,
            noise_type: NoiseType::White,

            fixed_pitch_enabled: false,
            fixed_frequency_hz: 440.0,

            amp_attack: 0.01,
            amp_decay: 0.1,
            amp_sustain: 0.7,
            amp_release: 0.3,

            pitch_env_attack: 0.01,
            pitch_env_decay: 0.1,
            pitch_env_sustain: 0.0,
            pitch_env_release: 0.1,
            pitch_env_amount: 0.0,

            filter_type: FilterType::LowPass,
            filter_cutoff_hz: 8000.0,
            filter_resonance: 1.0,

            filter_env_attack: 0.01,
            filter_env_decay: 0.1,
            filter_env_sustain: 0.5,
            filter_env_release: 0.2,
            filter_env_amount: 0.0,

            lfo_enabled: false,
            lfo_waveform: LfoWaveform::Sine,
            lfo_rate_hz: 5.0,
            lfo_bpm_sync: false,
            lfo_division: Division::Quarter,
            lfo_to_pitch_cents: 0.0,
            lfo_to_filter_hz: 0.0,
            lfo_to_amplitude: 0.0,
            lfo_to_phaser_rate: 0.0,
            lfo_to_delay_time: 0.0,

            distortion_enabled: false,
            distortion_amount: 20.0,
            distortion_output_gain: 0.5,

            delay_enabled: false,
            delay_time_secs: 0.3,
            delay_bpm_sync: false,
            delay_division: Division::Eighth,
            delay_feedback: 0.3,
            delay_wet: 0.3,

            phaser_enabled: false,
            phaser_rate_hz: 0.5,
            phaser_depth_hz: 700.0,
            phaser_feedback: 0.5,

            master_volume: 0.8,
        }
    }
}
