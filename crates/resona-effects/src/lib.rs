//! Per-voice effect stages for the resona synthesizer.
//!
//! The voice chain runs the three stages in a fixed order:
//! [`Distortion`] → [`Phaser`] → [`FeedbackDelay`]. Each stage is optional
//! and owned by the voice that uses it; there is no state shared across
//! voices. All stages implement [`resona_core::Effect`] and additionally
//! expose `process_modulated` entry points for the per-sample LFO routing
//! taps (phaser rate, delay time).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod delay;
pub mod distortion;
pub mod phaser;

pub use delay::FeedbackDelay;
pub use distortion::Distortion;
pub use phaser::Phaser;
