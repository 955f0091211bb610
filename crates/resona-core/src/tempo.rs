//! Musical tempo conversion: BPM plus a named note division into seconds
//! or Hz.
//!
//! Straight, triplet, and dotted divisions from whole note down to 1/32 are
//! supported. Division names use the conventional short labels ("1/4",
//! "1/8T", "1/4."); an unrecognized name falls back to a quarter note so a
//! preset with a bad label still produces musically sensible timing.

/// A musical note division relative to one quarter-note beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// Whole note ("1/1", 4 beats).
    #[cfg_attr(feature = "serde", serde(rename = "1/1"))]
    Whole,
    /// Half note ("1/2", 2 beats).
    #[cfg_attr(feature = "serde", serde(rename = "1/2"))]
    Half,
    /// Quarter note ("1/4", 1 beat).
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "1/4"))]
    Quarter,
    /// Eighth note ("1/8", 1/2 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/8"))]
    Eighth,
    /// Sixteenth note ("1/16", 1/4 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/16"))]
    Sixteenth,
    /// Thirty-second note ("1/32", 1/8 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/32"))]
    ThirtySecond,
    /// Quarter-note triplet ("1/4T", 2/3 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/4T"))]
    TripletQuarter,
    /// Eighth-note triplet ("1/8T", 1/3 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/8T"))]
    TripletEighth,
    /// Sixteenth-note triplet ("1/16T", 1/6 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/16T"))]
    TripletSixteenth,
    /// Dotted quarter ("1/4.", 1.5 beats).
    #[cfg_attr(feature = "serde", serde(rename = "1/4."))]
    DottedQuarter,
    /// Dotted eighth ("1/8.", 3/4 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/8."))]
    DottedEighth,
    /// Dotted sixteenth ("1/16.", 3/8 beat).
    #[cfg_attr(feature = "serde", serde(rename = "1/16."))]
    DottedSixteenth,
}

impl Division {
    /// Parse a division label.
    ///
    /// Unknown labels fall back to [`Division::Quarter`]; this path is hit
    /// by hand-edited or imported presets and must never fail.
    pub fn from_name(name: &str) -> Self {
        match name {
            "1/1" => Division::Whole,
            "1/2" => Division::Half,
            "1/4" => Division::Quarter,
            "1/8" => Division::Eighth,
            "1/16" => Division::Sixteenth,
            "1/32" => Division::ThirtySecond,
            "1/4T" => Division::TripletQuarter,
            "1/8T" => Division::TripletEighth,
            "1/16T" => Division::TripletSixteenth,
            "1/4." => Division::DottedQuarter,
            "1/8." => Division::DottedEighth,
            "1/16." => Division::DottedSixteenth,
            _ => Division::Quarter,
        }
    }

    /// The conventional short label.
    pub fn name(self) -> &'static str {
        match self {
            Division::Whole => "1/1",
            Division::Half => "1/2",
            Division::Quarter => "1/4",
            Division::Eighth => "1/8",
            Division::Sixteenth => "1/16",
            Division::ThirtySecond => "1/32",
            Division::TripletQuarter => "1/4T",
            Division::TripletEighth => "1/8T",
            Division::TripletSixteenth => "1/16T",
            Division::DottedQuarter => "1/4.",
            Division::DottedEighth => "1/8.",
            Division::DottedSixteenth => "1/16.",
        }
    }

    /// Duration in quarter-note beats.
    pub fn beats(self) -> f32 {
        match self {
            Division::Whole => 4.0,
            Division::Half => 2.0,
            Division::Quarter => 1.0,
            Division::Eighth => 0.5,
            Division::Sixteenth => 0.25,
            Division::ThirtySecond => 0.125,
            Division::TripletQuarter => 2.0 / 3.0,
            Division::TripletEighth => 1.0 / 3.0,
            Division::TripletSixteenth => 1.0 / 6.0,
            Division::DottedQuarter => 1.5,
            Division::DottedEighth => 0.75,
            Division::DottedSixteenth => 0.375,
        }
    }

    /// Duration in seconds at `bpm`.
    ///
    /// ```rust
    /// use resona_core::Division;
    ///
    /// // A quarter note at 120 BPM lasts half a second
    /// assert!((Division::Quarter.seconds(120.0) - 0.5).abs() < 1e-6);
    /// ```
    pub fn seconds(self, bpm: f32) -> f32 {
        60.0 / bpm * self.beats()
    }

    /// Repetition rate in Hz at `bpm`.
    ///
    /// ```rust
    /// use resona_core::Division;
    ///
    /// // Eighth notes at 120 BPM tick at 4 Hz
    /// assert!((Division::Eighth.hz(120.0) - 4.0).abs() < 1e-6);
    /// ```
    pub fn hz(self, bpm: f32) -> f32 {
        1.0 / self.seconds(bpm)
    }
}
