//! Scalar math helpers for tuning and signal conditioning.

use libm::exp2f;

/// Convert a MIDI note number to a frequency in Hz (equal temperament,
/// A4 = MIDI 69 = 440 Hz).
///
/// # Example
///
/// ```rust
/// use resona_core::midi_to_freq;
///
/// assert!((midi_to_freq(69) - 440.0).abs() < 1e-6);
/// assert!((midi_to_freq(60) - 261.6256).abs() < 0.001);
/// ```
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * exp2f((f32::from(note) - 69.0) / 12.0)
}

/// Convert a detune amount in cents to a frequency ratio.
///
/// 100 cents = one semitone, 1200 cents = one octave.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    exp2f(cents / 1200.0)
}

/// Convert a pitch offset in semitones to a frequency ratio.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Linear interpolation between `a` and `b` by `t` in [0, 1].
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Flush denormal values to zero.
///
/// Denormals cause severe CPU penalties in feedback paths (delay lines,
/// filter state). Called on any value that recirculates.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midi_reference_pitches() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-6);
        assert!((midi_to_freq(60) - 261.6256).abs() < 0.001);
        // One octave up doubles the frequency
        assert!((midi_to_freq(81) - 880.0).abs() < 1e-3);
    }

    #[test]
    fn cents_ratio_identities() {
        assert!((cents_to_ratio(0.0) - 1.0).abs() < 1e-7);
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
        assert!((cents_to_ratio(-1200.0) - 0.5).abs() < 1e-6);
        // 100 cents and 1 semitone agree
        assert!((cents_to_ratio(100.0) - semitones_to_ratio(1.0)).abs() < 1e-6);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn denormal_flushed() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(-1e-30), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
