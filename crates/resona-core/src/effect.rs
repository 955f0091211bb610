//! The [`Effect`] trait shared by all per-voice processing stages.
//!
//! Stages process mono samples one at a time; block processing is a thin
//! default on top of that. The trait is object-safe, though the voice chain
//! uses static dispatch throughout.

/// A mono audio processing stage.
///
/// Implementors must be real-time safe: `process` is called from the audio
/// path and may not allocate or block.
pub trait Effect {
    /// Process a single sample, advancing internal state by one tick.
    ///
    /// Input is nominally in [-1.0, 1.0]; stages tolerate excursions.
    fn process(&mut self, input: f32) -> f32;

    /// Process a buffer in place. Default loops over [`process`](Self::process).
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate, recalculating any dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state (delay memory, filter history) without touching
    /// parameters.
    fn reset(&mut self);
}
