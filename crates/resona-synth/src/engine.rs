//! The polyphonic engine: pitch-keyed voice table, tempo, master gain, and
//! the audio clock.

use alloc::vec::Vec;

use crate::params::SynthParams;
use crate::voice::Voice;

/// Number of voice slots, one per MIDI pitch.
const VOICE_SLOTS: usize = 128;

/// Polyphonic synthesizer engine.
///
/// At most one voice sounds per MIDI pitch. Playing a pitch that is already
/// resident drops the old voice and starts a fresh one in its place, so a
/// retrigger never doubles amplitude. Stopped voices ring out their release
/// tails in place and are reaped lazily inside the render loop.
///
/// All timing runs on a monotonic sample counter advanced by
/// [`SynthEngine::process`]; nothing here consults wall-clock time.
#[derive(Debug)]
pub struct SynthEngine {
    voices: Vec<Option<Voice>>,
    sample_rate: f32,
    bpm: f32,
    master_volume: f32,
    clock: u64,
}

impl SynthEngine {
    /// Create an engine at `sample_rate`. Tempo starts at 120 BPM, master
    /// gain at unity.
    pub fn new(sample_rate: f32) -> Self {
        let mut voices = Vec::with_capacity(VOICE_SLOTS);
        voices.resize_with(VOICE_SLOTS, || None);
        Self {
            voices,
            sample_rate,
            bpm: 120.0,
            master_volume: 1.0,
            clock: 0,
        }
    }

    /// Start a note. A voice already resident at `pitch` is dropped and
    /// replaced in the same call. Pitches above 127 are ignored; velocity
    /// is clamped to [0, 127].
    pub fn note_on(&mut self, pitch: u8, velocity: u8, params: &SynthParams) {
        let Some(slot) = self.voices.get_mut(usize::from(pitch)) else {
            return;
        };
        *slot = Some(Voice::new(
            pitch,
            velocity.min(127),
            params,
            self.sample_rate,
            self.bpm,
            params.master_volume,
        ));
    }

    /// Release the note at `pitch`. Unknown pitches are silently ignored.
    /// The voice stays resident, ringing out, until the render loop reaps
    /// it.
    pub fn note_off(&mut self, pitch: u8) {
        if let Some(Some(voice)) = self.voices.get_mut(usize::from(pitch)) {
            voice.stop(self.clock);
        }
    }

    /// Set the tempo, clamped to [20, 999] BPM, and retune every resident
    /// voice's synced LFO and delay without restarting them.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.clamp(20.0, 999.0);
        for voice in self.voices.iter_mut().flatten() {
            voice.set_bpm(self.bpm);
        }
    }

    /// Set the master output gain, clamped to [0, 1]. Takes effect on the
    /// next rendered sample.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Release every resident voice. They ring out through their release
    /// tails rather than cutting to silence.
    pub fn stop_all(&mut self) {
        for voice in self.voices.iter_mut().flatten() {
            voice.stop(self.clock);
        }
    }

    /// Render one output sample: sum all live voices, reap finished ones,
    /// apply master gain, advance the clock. Never allocates.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut mix = 0.0;
        for slot in &mut self.voices {
            if let Some(voice) = slot {
                mix += voice.render(self.clock);
                if voice.is_done() {
                    *slot = None;
                }
            }
        }
        self.clock += 1;
        mix * self.master_volume
    }

    /// Render a whole block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer {
            *sample = self.process();
        }
    }

    /// Number of resident voices, including those still ringing out.
    pub fn voice_count(&self) -> usize {
        self.voices.iter().flatten().count()
    }

    /// The resident voice at `pitch`, if any.
    pub fn voice(&self, pitch: u8) -> Option<&Voice> {
        self.voices.get(usize::from(pitch))?.as_ref()
    }

    /// Current tempo in BPM.
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Current master gain.
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Sample rate the engine renders at.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Samples rendered since construction.
    pub fn clock(&self) -> u64 {
        self.clock
    }
}
