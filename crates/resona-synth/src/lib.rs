//! Polyphonic subtractive/FM-hybrid synthesis engine.
//!
//! The engine renders continuous audio from a stream of note-on/note-off
//! events and a [`SynthParams`] snapshot. Each sounding note is a [`Voice`]:
//! two oscillators (the second may phase-modulate the first), an optional
//! noise source, a resonant filter, three envelopes, an LFO modulation
//! router, and a per-voice effects chain. [`SynthEngine`] owns the master
//! gain, the tempo, and the pitch-keyed voice table.
//!
//! # Architecture
//!
//! Ownership is a strict tree: the engine owns voices, voices own their DSP
//! stages by value. The only feedback paths are the bounded buffers inside
//! the delay and phaser stages, so no reference counting or graph machinery
//! is needed. Rendering is allocation-free; the allocating steps (noise and
//! delay buffers) happen once at voice construction.
//!
//! # Example
//!
//! ```rust
//! use resona_synth::{SynthEngine, SynthParams};
//!
//! let mut engine = SynthEngine::new(48000.0);
//! let params = SynthParams::default();
//!
//! engine.note_on(60, 100, &params);
//! let mut block = [0.0f32; 256];
//! engine.process_block(&mut block);
//! engine.note_off(60);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod engine;
pub mod envelope;
pub mod modulation;
pub mod oscillator;
pub mod params;
pub mod voice;

pub use engine::SynthEngine;
pub use envelope::{Envelope, EnvelopeSegments, EnvelopeStage};
pub use modulation::{ModRouter, ModValues};
pub use oscillator::Oscillator;
pub use params::{FilterType, SynthParams, Waveform};
pub use voice::{Voice, VoiceState};

pub use resona_core::{Division, LfoWaveform, NoiseType, cents_to_ratio, midi_to_freq};
