//! Core DSP primitives for the resona synthesizer.
//!
//! This crate holds the building blocks shared by the synthesis engine and
//! the effect stages: the [`Effect`] trait, parameter smoothing, delay lines,
//! filters, LFOs, tempo/division conversion, and noise buffer generation.
//! Everything here is real-time safe: construction may allocate, processing
//! never does.
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (with `alloc`) for embedded targets.
//! Disable the default `std` feature:
//!
//! ```toml
//! resona-core = { version = "0.1", default-features = false }
//! ```
//!
//! Math functions come from `libm` so no std float intrinsics are required.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod noise;
pub mod param;
pub mod tempo;

pub use biquad::{
    Biquad, Coefficients, allpass_coefficients, bandpass_coefficients, highpass_coefficients,
    lowpass_coefficients, notch_coefficients,
};
pub use delay::InterpolatedDelay;
pub use effect::Effect;
pub use lfo::{Lfo, LfoWaveform};
pub use math::{cents_to_ratio, flush_denormal, lerp, midi_to_freq, semitones_to_ratio};
pub use noise::{NoiseSource, NoiseType};
pub use param::SmoothedParam;
pub use tempo::Division;
