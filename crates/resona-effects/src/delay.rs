//! Feedback delay with wet/dry mix and tempo-syncable base time.

use resona_core::{Effect, InterpolatedDelay, SmoothedParam, flush_denormal};

/// Longest base delay time in seconds.
const MAX_DELAY_SECONDS: f32 = 1.0;

/// Extra buffer headroom in seconds for LFO delay-time modulation.
const MOD_HEADROOM_SECONDS: f32 = 0.25;

/// A single-tap feedback delay.
///
/// Output mixes the dry input at `1 - wet` with the delayed tap at `wet`.
/// Feedback is clamped to [0, 0.95] so the echo train always decays. The
/// base time can be re-set at any time (tempo changes); a short smoothing
/// ramp keeps the change from clicking.
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    line: InterpolatedDelay,
    time_samples: SmoothedParam,
    feedback: SmoothedParam,
    wet: SmoothedParam,
    sample_rate: f32,
}

impl FeedbackDelay {
    /// Create a delay. Defaults: 300 ms, feedback 0.3, wet 0.3.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            line: InterpolatedDelay::from_time(
                sample_rate,
                MAX_DELAY_SECONDS + MOD_HEADROOM_SECONDS,
            ),
            time_samples: SmoothedParam::with_config(0.3 * sample_rate, sample_rate, 20.0),
            feedback: SmoothedParam::with_config(0.3, sample_rate, 10.0),
            wet: SmoothedParam::with_config(0.3, sample_rate, 10.0),
            sample_rate,
        }
    }

    /// Set the base delay time in seconds, clamped to (0, 1].
    pub fn set_time_secs(&mut self, seconds: f32) {
        let clamped = seconds.clamp(0.001, MAX_DELAY_SECONDS);
        self.time_samples.set_target(clamped * self.sample_rate);
    }

    /// Current base delay time in seconds.
    pub fn time_secs(&self) -> f32 {
        self.time_samples.target() / self.sample_rate
    }

    /// Set the feedback amount, clamped to [0, 0.95].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set the wet level, clamped to [0, 1].
    pub fn set_wet(&mut self, wet: f32) {
        self.wet.set_target(wet.clamp(0.0, 1.0));
    }

    /// Process one sample with an additive delay-time offset in seconds.
    ///
    /// The offset comes from the voice LFO's delay-time tap and applies for
    /// this sample only.
    #[inline]
    pub fn process_modulated(&mut self, input: f32, time_offset_secs: f32) -> f32 {
        let base = self.time_samples.advance();
        let feedback = self.feedback.advance();
        let wet = self.wet.advance();

        let delay_samples = (base + time_offset_secs * self.sample_rate)
            .clamp(1.0, (self.line.capacity() - 2) as f32);

        let delayed = self.line.read(delay_samples);
        self.line.write(flush_denormal(input + delayed * feedback));

        input * (1.0 - wet) + delayed * wet
    }
}

impl Effect for FeedbackDelay {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.process_modulated(input, 0.0)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let seconds = self.time_secs();
        self.sample_rate = sample_rate;
        self.line = InterpolatedDelay::from_time(
            sample_rate,
            MAX_DELAY_SECONDS + MOD_HEADROOM_SECONDS,
        );
        self.time_samples.set_sample_rate(sample_rate);
        self.time_samples.set_immediate(seconds * sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.wet.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.line.clear();
        self.time_samples.snap_to_target();
        self.feedback.snap_to_target();
        self.wet.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_reappears_after_delay_time() {
        let sr = 48000.0;
        let mut delay = FeedbackDelay::new(sr);
        delay.set_time_secs(0.1);
        delay.set_wet(1.0);
        delay.set_feedback(0.0);
        delay.reset();

        delay.process(1.0);
        let expected = (0.1 * sr) as usize;
        let mut peak_at = 0;
        let mut peak = 0.0f32;
        for n in 1..10000 {
            let out = delay.process(0.0);
            if out.abs() > peak {
                peak = out.abs();
                peak_at = n;
            }
        }
        assert!(peak > 0.9, "echo should be near unity, got {peak}");
        assert!(
            (peak_at as i64 - expected as i64).abs() <= 2,
            "echo at {peak_at}, expected ~{expected}"
        );
    }

    #[test]
    fn echo_train_decays_at_max_feedback() {
        let sr = 8000.0;
        let mut delay = FeedbackDelay::new(sr);
        delay.set_time_secs(0.05); // 400 samples
        delay.set_wet(1.0);
        delay.set_feedback(0.95);
        delay.reset();

        delay.process(1.0);
        let period = (0.05 * sr) as usize;
        let output: Vec<f32> = (0..period * 9).map(|_| delay.process(0.0)).collect();

        // Locate the first echo, then sample a local peak around each
        // expected repeat so window boundaries never split an echo.
        let first = output
            .iter()
            .position(|s| s.abs() > 0.5)
            .expect("first echo missing");
        let mut repeats = Vec::new();
        for k in 0..8 {
            let center = first + k * period;
            let lo = center.saturating_sub(4);
            let hi = (center + 4).min(output.len() - 1);
            let peak = output[lo..=hi].iter().fold(0.0f32, |m, s| m.max(s.abs()));
            repeats.push(peak);
        }
        for pair in repeats.windows(2) {
            assert!(
                pair[1] <= pair[0] * 0.95 + 1e-4,
                "repeat {} must not exceed {} x 0.95",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn dry_path_when_wet_is_zero() {
        let mut delay = FeedbackDelay::new(48000.0);
        delay.set_wet(0.0);
        delay.reset();
        assert!((delay.process(0.7) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn feedback_clamped_to_stable_range() {
        let mut delay = FeedbackDelay::new(48000.0);
        delay.set_feedback(2.0);
        delay.reset();
        delay.set_time_secs(0.01);
        // Even with hostile settings the loop must not blow up
        delay.process(1.0);
        let mut peak = 0.0f32;
        for _ in 0..48000 {
            peak = peak.max(delay.process(0.0).abs());
        }
        assert!(peak.is_finite());
        assert!(peak <= 1.01);
    }

    #[test]
    fn time_offset_shifts_read_position() {
        let sr = 48000.0;
        let mut delay = FeedbackDelay::new(sr);
        delay.set_time_secs(0.1);
        delay.set_wet(1.0);
        delay.set_feedback(0.0);
        delay.reset();

        delay.process_modulated(1.0, 0.0);
        // Read 50 ms early thanks to a -0.05 s offset
        let early = (0.05 * sr) as usize;
        let mut found_at = 0;
        for n in 1..10000 {
            let out = delay.process_modulated(0.0, -0.05);
            if out.abs() > 0.5 {
                found_at = n;
                break;
            }
        }
        assert!(
            (found_at as i64 - early as i64).abs() <= 3,
            "offset echo at {found_at}, expected ~{early}"
        );
    }
}
