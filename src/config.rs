//! Configuration parameters for chart generation

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// Largest accepted `lane_range` (129 lanes)
pub const MAX_LANE_RANGE: u32 = 64;

/// Rounding applied to a note's representative pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PitchRounding {
    /// Round to the nearest half-semitone (default)
    HalfSemitone,
    /// Round to the nearest semitone
    Semitone,
    /// Keep the averaged pitch as-is
    Exact,
}

impl PitchRounding {
    /// Apply the rounding rule to a MIDI pitch
    pub fn apply(self, midi: f32) -> f32 {
        match self {
            PitchRounding::HalfSemitone => (midi * 2.0).round() / 2.0,
            PitchRounding::Semitone => midi.round(),
            PitchRounding::Exact => midi,
        }
    }
}

impl Default for PitchRounding {
    fn default() -> Self {
        Self::HalfSemitone
    }
}

/// How the pitch range of a growing phrase is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhraseRange {
    /// `max - min` of every member pitch, including the incoming note (default)
    AbsoluteSpan,
    /// Distance of the incoming note from the running mean of the phrase
    RollingMean,
}

impl Default for PhraseRange {
    fn default() -> Self {
        Self::AbsoluteSpan
    }
}

/// Chart generation configuration
///
/// Every field has a documented default; partial bundles deserialize with
/// the remaining fields filled from [`ChartConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    // Extraction (passed through to metadata)
    /// Analysis window of the external pitch detector in samples (default: 2048)
    pub window_size: usize,

    /// Hop of the external pitch detector in samples (default: 512)
    pub hop_size: usize,

    // Voicing
    /// Lowest frequency treated as voiced, in Hz (default: 70.0)
    pub min_freq: f32,

    /// Highest frequency treated as voiced, in Hz (default: 1100.0)
    pub max_freq: f32,

    /// Frames with confidence below this are unvoiced (default: 0.3)
    pub min_confidence: f32,

    // Conditioning
    /// Trailing window of accepted pitches used as octave reference, in frames (default: 5)
    pub octave_window: usize,

    /// Distance from an exact octave multiple still treated as an octave jump,
    /// in semitones (default: 0.5)
    pub octave_tolerance: f32,

    /// Moving-average window over voiced frames, in frames (default: 3)
    pub smooth_frames: usize,

    // Stability
    /// Frames a new pitch must persist before the held pitch switches (default: 3)
    pub stability_frames: usize,

    /// Pitch difference absorbed into the held pitch, in semitones (default: 0.5)
    pub hold_tolerance: f32,

    /// Longest unvoiced gap bridged by the gap filler, in seconds (default: 0.1)
    pub max_gap_fill: f32,

    // Notes
    /// Shortest note kept, in seconds (default: 0.1)
    pub min_note_duration: f32,

    /// Largest silence merged between adjacent notes, in seconds (default: 0.15)
    pub merge_gap: f32,

    /// Largest pitch difference merged between adjacent notes, in semitones (default: 0.5)
    pub note_pitch_tolerance: f32,

    /// Rounding of representative note pitch (default: half-semitone)
    pub pitch_rounding: PitchRounding,

    // Phrases
    /// Largest silence inside one phrase, in seconds (default: 0.3)
    pub phrase_gap: f32,

    /// Largest pitch range inside one phrase, in semitones (default: 5.0)
    pub phrase_pitch_tolerance: f32,

    /// Phrase pitch range measurement (default: absolute span)
    pub phrase_range: PhraseRange,

    /// Duration multiplier applied to every note of a phrase (default: 1.0)
    pub stretch_factor: f32,

    // Final pass
    /// Merge gap of the final whole-track pass, in seconds (default: 0.05)
    pub final_merge_gap: f32,

    // Lanes
    /// Lanes on each side of the center lane; total lanes = 2 * lane_range + 1
    /// (default: 4, at most `MAX_LANE_RANGE`)
    pub lane_range: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            hop_size: 512,
            min_freq: 70.0,
            max_freq: 1100.0,
            min_confidence: 0.3,
            octave_window: 5,
            octave_tolerance: 0.5,
            smooth_frames: 3,
            stability_frames: 3,
            hold_tolerance: 0.5,
            max_gap_fill: 0.1,
            min_note_duration: 0.1,
            merge_gap: 0.15,
            note_pitch_tolerance: 0.5,
            pitch_rounding: PitchRounding::HalfSemitone,
            phrase_gap: 0.3,
            phrase_pitch_tolerance: 5.0,
            phrase_range: PhraseRange::AbsoluteSpan,
            stretch_factor: 1.0,
            final_merge_gap: 0.05,
            lane_range: 4,
        }
    }
}

impl ChartConfig {
    /// Total number of lanes (`2 * lane_range + 1`)
    pub fn lane_count(&self) -> u32 {
        self.lane_range.saturating_mul(2).saturating_add(1)
    }

    /// Check every option against its valid range
    ///
    /// # Errors
    ///
    /// Returns `ChartError::InvalidConfig` naming the first offending option
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.window_size == 0 {
            return Err(invalid("window_size must be >= 1"));
        }
        if self.hop_size == 0 {
            return Err(invalid("hop_size must be >= 1"));
        }

        require_finite("min_freq", self.min_freq)?;
        require_finite("max_freq", self.max_freq)?;
        if self.min_freq <= 0.0 {
            return Err(invalid(format!("min_freq must be > 0, got {}", self.min_freq)));
        }
        if self.max_freq <= self.min_freq {
            return Err(invalid(format!(
                "max_freq ({}) must be greater than min_freq ({})",
                self.max_freq, self.min_freq
            )));
        }

        require_finite("min_confidence", self.min_confidence)?;
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(invalid(format!(
                "min_confidence must be in [0.0, 1.0], got {}",
                self.min_confidence
            )));
        }

        if self.octave_window == 0 {
            return Err(invalid("octave_window must be >= 1"));
        }
        require_finite("octave_tolerance", self.octave_tolerance)?;
        if self.octave_tolerance <= 0.0 || self.octave_tolerance >= 6.0 {
            return Err(invalid(format!(
                "octave_tolerance must be in (0.0, 6.0), got {}",
                self.octave_tolerance
            )));
        }

        if self.smooth_frames == 0 {
            return Err(invalid("smooth_frames must be >= 1"));
        }
        if self.stability_frames == 0 {
            return Err(invalid("stability_frames must be >= 1"));
        }

        require_positive("hold_tolerance", self.hold_tolerance)?;
        require_positive("min_note_duration", self.min_note_duration)?;

        require_non_negative("max_gap_fill", self.max_gap_fill)?;
        require_non_negative("merge_gap", self.merge_gap)?;
        require_non_negative("note_pitch_tolerance", self.note_pitch_tolerance)?;
        require_non_negative("phrase_gap", self.phrase_gap)?;
        require_non_negative("phrase_pitch_tolerance", self.phrase_pitch_tolerance)?;
        require_non_negative("final_merge_gap", self.final_merge_gap)?;

        require_finite("stretch_factor", self.stretch_factor)?;
        if self.stretch_factor <= 0.0 || self.stretch_factor > 4.0 {
            return Err(invalid(format!(
                "stretch_factor must be in (0.0, 4.0], got {}",
                self.stretch_factor
            )));
        }

        if self.lane_range == 0 || self.lane_range > MAX_LANE_RANGE {
            return Err(invalid(format!(
                "lane_range must be in [1, {}], got {}",
                MAX_LANE_RANGE, self.lane_range
            )));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ChartError {
    ChartError::InvalidConfig(msg.into())
}

fn require_finite(name: &str, value: f32) -> Result<(), ChartError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be finite, got {}", name, value)))
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), ChartError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be > 0, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f32) -> Result<(), ChartError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be >= 0, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ChartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lane_count(), 9);
    }

    #[test]
    fn test_rejects_zero_lane_range() {
        let config = ChartConfig {
            lane_range: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(ChartError::InvalidConfig(msg)) => assert!(msg.contains("lane_range")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_lane_range_upper_bound() {
        let widest = ChartConfig {
            lane_range: MAX_LANE_RANGE,
            ..Default::default()
        };
        assert!(widest.validate().is_ok());
        assert_eq!(widest.lane_count(), 129);

        for lane_range in [MAX_LANE_RANGE + 1, u32::MAX] {
            let config = ChartConfig {
                lane_range,
                ..Default::default()
            };
            match config.validate() {
                Err(ChartError::InvalidConfig(msg)) => assert!(msg.contains("lane_range")),
                other => panic!("expected InvalidConfig, got {:?}", other),
            }
        }

        // Never overflows, even unvalidated
        let huge = ChartConfig {
            lane_range: u32::MAX,
            ..Default::default()
        };
        assert_eq!(huge.lane_count(), u32::MAX);
    }

    #[test]
    fn test_rejects_negative_durations() {
        for config in [
            ChartConfig {
                merge_gap: -0.1,
                ..Default::default()
            },
            ChartConfig {
                min_note_duration: 0.0,
                ..Default::default()
            },
            ChartConfig {
                final_merge_gap: -1.0,
                ..Default::default()
            },
            ChartConfig {
                max_gap_fill: f32::NAN,
                ..Default::default()
            },
        ] {
            assert!(config.validate().is_err(), "should reject {:?}", config);
        }
    }

    #[test]
    fn test_rejects_inverted_frequency_window() {
        let config = ChartConfig {
            min_freq: 500.0,
            max_freq: 400.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stretch_factor_bounds() {
        let ok = ChartConfig {
            stretch_factor: 4.0,
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let zero = ChartConfig {
            stretch_factor: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_pitch_rounding() {
        assert_eq!(PitchRounding::HalfSemitone.apply(60.3), 60.5);
        assert_eq!(PitchRounding::HalfSemitone.apply(60.2), 60.0);
        assert_eq!(PitchRounding::Semitone.apply(60.6), 61.0);
        assert_eq!(PitchRounding::Exact.apply(60.3), 60.3);
    }
}
