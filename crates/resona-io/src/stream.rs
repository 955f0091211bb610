//! The output stream and the control channel that feeds it.
//!
//! Commands cross from the caller's thread into the audio callback over a
//! bounded crossbeam channel. The callback drains the queue at the start of
//! each buffer, so a command applies at the next quantum boundary, never
//! mid-sample. A full queue drops the command rather than blocking the
//! sender; the audio thread itself never waits on anything.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream};
use crossbeam_channel::{Receiver, Sender, bounded};
use resona_synth::{SynthEngine, SynthParams};

use crate::{Error, Result};

/// Commands held in the queue at most; beyond this, sends are dropped.
const COMMAND_QUEUE_CAPACITY: usize = 256;

/// A control message for the engine inside the audio callback.
#[derive(Debug, Clone)]
pub enum SynthCommand {
    /// Start a note with a parameter snapshot.
    NoteOn {
        /// MIDI pitch, 0 to 127.
        pitch: u8,
        /// MIDI velocity, 0 to 127.
        velocity: u8,
        /// The sound to build the voice from.
        params: SynthParams,
    },
    /// Release a note.
    NoteOff {
        /// MIDI pitch of the note to release.
        pitch: u8,
    },
    /// Change the tempo in BPM.
    SetBpm(f32),
    /// Change the master output gain.
    SetMasterVolume(f32),
    /// Release every sounding note.
    StopAll,
}

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// List the names of all available output devices.
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    for device in host.output_devices()? {
        if let Ok(name) = device_name(&device) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Cloneable control handle for a running [`SynthStream`].
///
/// Every operation is a non-blocking send. If the queue is full or the
/// stream is gone, the command is dropped with a warning; the caller is
/// never blocked by the audio thread.
#[derive(Debug, Clone)]
pub struct SynthController {
    tx: Sender<SynthCommand>,
}

impl SynthController {
    /// Start a note.
    pub fn note_on(&self, pitch: u8, velocity: u8, params: SynthParams) {
        self.send(SynthCommand::NoteOn {
            pitch,
            velocity,
            params,
        });
    }

    /// Release a note.
    pub fn note_off(&self, pitch: u8) {
        self.send(SynthCommand::NoteOff { pitch });
    }

    /// Change the tempo.
    pub fn set_bpm(&self, bpm: f32) {
        self.send(SynthCommand::SetBpm(bpm));
    }

    /// Change the master gain.
    pub fn set_master_volume(&self, volume: f32) {
        self.send(SynthCommand::SetMasterVolume(volume));
    }

    /// Release every sounding note.
    pub fn stop_all(&self) {
        self.send(SynthCommand::StopAll);
    }

    fn send(&self, command: SynthCommand) {
        if self.tx.try_send(command).is_err() {
            tracing::warn!("synth command dropped: queue full or stream closed");
        }
    }
}

/// Apply one queued command to the engine.
fn apply_command(engine: &mut SynthEngine, command: SynthCommand) {
    match command {
        SynthCommand::NoteOn {
            pitch,
            velocity,
            params,
        } => {
            tracing::debug!(pitch, velocity, "note on");
            engine.note_on(pitch, velocity, &params);
        }
        SynthCommand::NoteOff { pitch } => {
            tracing::debug!(pitch, "note off");
            engine.note_off(pitch);
        }
        SynthCommand::SetBpm(bpm) => engine.set_bpm(bpm),
        SynthCommand::SetMasterVolume(volume) => engine.set_master_volume(volume),
        SynthCommand::StopAll => engine.stop_all(),
    }
}

/// Drain the queue, then render one buffer of interleaved frames.
fn render_quantum(
    engine: &mut SynthEngine,
    rx: &Receiver<SynthCommand>,
    data: &mut [f32],
    channels: usize,
) {
    while let Ok(command) = rx.try_recv() {
        apply_command(engine, command);
    }
    for frame in data.chunks_mut(channels) {
        let sample = engine.process();
        frame.fill(sample);
    }
}

/// A live audio output stream driving a [`SynthEngine`].
///
/// Created with [`SynthStream::open`]; audio plays until the value is
/// dropped. The engine lives inside the cpal callback and is reachable only
/// through the [`SynthController`] returned alongside.
pub struct SynthStream {
    _stream: Stream,
    sample_rate: u32,
    channels: u16,
}

impl SynthStream {
    /// Open the default output device and start rendering.
    ///
    /// Fails with [`Error`] if there is no output device, the device's
    /// native format is not f32, or the stream cannot be built or started.
    /// On failure nothing is left running and the call can simply be
    /// retried.
    pub fn open() -> Result<(Self, SynthController)> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
        let config = device.default_output_config()?;

        if config.sample_format() != SampleFormat::F32 {
            return Err(Error::UnsupportedFormat(config.sample_format()));
        }

        let sample_rate = config.sample_rate();
        let channels = config.channels();

        let (tx, rx) = bounded::<SynthCommand>(COMMAND_QUEUE_CAPACITY);
        let mut engine = SynthEngine::new(sample_rate as f32);

        let channel_count = usize::from(channels);
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                render_quantum(&mut engine, &rx, data, channel_count);
            },
            |err| tracing::error!("output stream error: {err}"),
            None,
        )?;
        stream.play()?;

        let name = device_name(&device).unwrap_or_else(|_| String::from("unknown"));
        tracing::info!(
            device = %name,
            sample_rate,
            channels,
            "synth output stream started"
        );

        Ok((
            Self {
                _stream: stream,
                sample_rate,
                channels,
            },
            SynthController { tx },
        ))
    }

    /// Sample rate the stream renders at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of output channels; the mono engine output is copied to all.
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
