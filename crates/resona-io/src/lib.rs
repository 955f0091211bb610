//! Audio output and control plumbing for the resona synthesizer.
//!
//! This crate owns the host-facing side of the system: it opens a cpal
//! output stream, moves a [`resona_synth::SynthEngine`] into the audio
//! callback, and hands the caller a cloneable [`SynthController`] whose
//! commands travel over a bounded lock-free queue. The audio callback
//! drains pending commands at the top of each buffer, then renders; it
//! never blocks or allocates while rendering.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resona_io::SynthStream;
//! use resona_synth::SynthParams;
//!
//! let (stream, controller) = SynthStream::open()?;
//! let params = SynthParams::default();
//!
//! controller.note_on(60, 100, params);
//! std::thread::sleep(std::time::Duration::from_millis(500));
//! controller.note_off(60);
//! // Audio stops when `stream` is dropped.
//! ```

mod stream;

pub use stream::{SynthCommand, SynthController, SynthStream, list_output_devices};

/// Error types for stream setup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No audio output device available on the system.
    #[error("no audio output device available")]
    NoOutputDevice,

    /// The device's native sample format is not f32.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),

    /// The device refused to report a default stream configuration.
    #[error("default stream config error: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    /// Device enumeration failed.
    #[error("device enumeration error: {0}")]
    DeviceEnumeration(#[from] cpal::DevicesError),

    /// Output stream construction failed.
    #[error("stream build error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    /// The stream was built but refused to start.
    #[error("stream playback error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Convenience result type for stream setup.
pub type Result<T> = std::result::Result<T, Error>;
