//! Linear segment ADSR envelope.
//!
//! Unlike an analog-modeled envelope, every segment here is a straight line
//! in the controlled quantity. The envelope is parameterized by explicit
//! values rather than normalized levels, so the same type drives amplitude
//! (0 to peak gain), filter cutoff (Hz), and pitch (Hz).

/// Envelope lifecycle stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Not yet triggered; holds its initial value.
    #[default]
    Idle,
    /// Ramping from the start value to the peak.
    Attack,
    /// Ramping from the peak to the sustain value.
    Decay,
    /// Holding the sustain value until released.
    Sustain,
    /// Ramping from the release-time value to the base value.
    Release,
    /// Release complete; holds the base value forever.
    Finished,
}

/// Value and timing plan for one envelope run.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeSegments {
    /// Value at trigger time.
    pub start: f32,
    /// Value reached at the end of the attack ramp.
    pub peak: f32,
    /// Value held during sustain.
    pub sustain: f32,
    /// Value the release ramp lands on.
    pub base: f32,
    /// Attack duration in seconds.
    pub attack_secs: f32,
    /// Decay duration in seconds.
    pub decay_secs: f32,
    /// Release duration in seconds.
    pub release_secs: f32,
}

/// A one-shot linear ADSR envelope.
///
/// `trigger` starts the attack immediately; `release` may be called from
/// any live stage and performs cancel-and-ramp: whatever segment is in
/// flight is abandoned, the current value is snapshotted, and the envelope
/// ramps linearly from there to the base value. Re-triggering a live
/// envelope is unsupported; voices are recreated on retrigger instead.
#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    value: f32,
    sample_rate: f32,
    sustain: f32,
    base: f32,
    release_secs: f32,
    decay_secs: f32,
    peak: f32,
    // Active ramp
    increment: f32,
    remaining: u32,
}

impl Envelope {
    /// Create an idle envelope.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stage: EnvelopeStage::Idle,
            value: 0.0,
            sample_rate,
            sustain: 0.0,
            base: 0.0,
            release_secs: 0.0,
            decay_secs: 0.0,
            peak: 0.0,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Start the envelope. Negative durations are clamped to zero; a
    /// zero-length segment jumps instantly to its end value.
    pub fn trigger(&mut self, segments: EnvelopeSegments) {
        self.value = segments.start;
        self.sustain = segments.sustain;
        self.base = segments.base;
        self.peak = segments.peak;
        self.decay_secs = segments.decay_secs.max(0.0);
        self.release_secs = segments.release_secs.max(0.0);

        let attack_samples = self.to_samples(segments.attack_secs);
        if attack_samples == 0 {
            self.value = segments.peak;
            self.begin_decay();
        } else {
            self.stage = EnvelopeStage::Attack;
            self.remaining = attack_samples;
            self.increment = (segments.peak - segments.start) / attack_samples as f32;
        }
    }

    /// Begin the release ramp from the current value.
    ///
    /// Idempotent: calls during Release or Finished do nothing. Calls while
    /// Idle also do nothing (there is no value to release from).
    pub fn release(&mut self) {
        match self.stage {
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Sustain => {}
            EnvelopeStage::Idle | EnvelopeStage::Release | EnvelopeStage::Finished => return,
        }

        let release_samples = self.to_samples(self.release_secs);
        if release_samples == 0 {
            self.value = self.base;
            self.stage = EnvelopeStage::Finished;
        } else {
            self.stage = EnvelopeStage::Release;
            self.remaining = release_samples;
            self.increment = (self.base - self.value) / release_samples as f32;
        }
    }

    /// Advance one sample and return the current value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle | EnvelopeStage::Sustain | EnvelopeStage::Finished => {}

            EnvelopeStage::Attack => {
                self.value += self.increment;
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.value = self.peak;
                    self.begin_decay();
                }
            }

            EnvelopeStage::Decay => {
                self.value += self.increment;
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.value = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Release => {
                self.value += self.increment;
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.value = self.base;
                    self.stage = EnvelopeStage::Finished;
                }
            }
        }
        self.value
    }

    /// Current value without advancing.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// True once the release ramp has completed.
    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Finished
    }

    fn begin_decay(&mut self) {
        let decay_samples = self.to_samples(self.decay_secs);
        if decay_samples == 0 {
            self.value = self.sustain;
            self.stage = EnvelopeStage::Sustain;
        } else {
            self.stage = EnvelopeStage::Decay;
            self.remaining = decay_samples;
            self.increment = (self.sustain - self.value) / decay_samples as f32;
        }
    }

    fn to_samples(&self, seconds: f32) -> u32 {
        (seconds.max(0.0) * self.sample_rate) as u32
    }
}
