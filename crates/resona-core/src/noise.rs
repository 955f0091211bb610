//! Looped noise buffers for the voice noise source.
//!
//! A noise source generates its full buffer once at construction (two
//! seconds of samples) and then loops it, so the audio path does no random
//! number generation. The loop point is not stitched; the occasional click
//! at the wrap is accepted.

use alloc::vec::Vec;

/// Noise color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NoiseType {
    /// Flat spectrum, uniform samples in [-1, 1].
    #[default]
    White,
    /// 1/f spectrum via Paul Kellet's six-pole filter refinement.
    Pink,
}

/// Seconds of audio held in a noise buffer.
const BUFFER_SECONDS: f32 = 2.0;

// Xorshift32. Deterministic per seed, good enough spectrally for audio noise.
#[derive(Debug, Clone)]
struct Xorshift32(u32);

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        // State must never be zero
        Self(if seed == 0 { 0x9e3779b9 } else { seed })
    }

    #[inline]
    fn next_bipolar(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as i32 as f32) / (i32::MAX as f32)
    }
}

/// A pre-rendered, looping noise buffer.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    buffer: Vec<f32>,
    position: usize,
}

impl NoiseSource {
    /// Generate a noise buffer of the given color.
    ///
    /// `seed` makes the source deterministic; any value is accepted.
    pub fn new(noise_type: NoiseType, sample_rate: f32, seed: u32) -> Self {
        let len = (sample_rate * BUFFER_SECONDS) as usize;
        let mut rng = Xorshift32::new(seed);
        let mut buffer = Vec::with_capacity(len);

        match noise_type {
            NoiseType::White => {
                for _ in 0..len {
                    buffer.push(rng.next_bipolar());
                }
            }
            NoiseType::Pink => {
                // Paul Kellet's pink filter: six leaky integrators over the
                // white source, 0.11 output scale to normalize loudness.
                let (mut b0, mut b1, mut b2) = (0.0f32, 0.0f32, 0.0f32);
                let (mut b3, mut b4, mut b5) = (0.0f32, 0.0f32, 0.0f32);
                let mut b6 = 0.0f32;
                for _ in 0..len {
                    let white = rng.next_bipolar();
                    b0 = 0.99886 * b0 + white * 0.0555179;
                    b1 = 0.99332 * b1 + white * 0.0750759;
                    b2 = 0.96900 * b2 + white * 0.1538520;
                    b3 = 0.86650 * b3 + white * 0.3104856;
                    b4 = 0.55000 * b4 + white * 0.5329522;
                    b5 = -0.7616 * b5 - white * 0.0168980;
                    let out = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11;
                    b6 = white * 0.115926;
                    buffer.push(out);
                }
            }
        }

        Self {
            buffer,
            position: 0,
        }
    }

    /// Next sample, wrapping at the buffer end.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let sample = self.buffer[self.position];
        self.position += 1;
        if self.position >= self.buffer.len() {
            self.position = 0;
        }
        sample
    }

    /// Buffer length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if the buffer holds no samples (zero sample rate).
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Read-only view of the rendered buffer.
    pub fn samples(&self) -> &[f32] {
        &self.buffer
    }
}
