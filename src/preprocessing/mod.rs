//! Pitch trace conditioning
//!
//! Turns raw detector frames into a clean MIDI trace:
//! - Voicing (frequency window + confidence floor) and Hz to MIDI conversion
//! - Octave-jump correction
//! - Voiced-only smoothing

pub mod octave;
pub mod pitch;
pub mod smoothing;

use crate::config::ChartConfig;
use crate::trace::{MidiFrame, PitchFrame};

/// Run the full conditioner over a validated trace
///
/// Output has one frame per input frame with identical timestamps.
pub fn condition(frames: &[PitchFrame], config: &ChartConfig) -> Vec<MidiFrame> {
    let midi = pitch::to_midi_frames(frames, config);
    let voiced = midi.iter().filter(|f| f.is_voiced()).count();
    log::debug!("{} of {} frames voiced", voiced, midi.len());

    let corrected = octave::correct_octaves(&midi, config.octave_window, config.octave_tolerance);
    smoothing::smooth_voiced(&corrected, config.smooth_frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_octave_glitch_then_smooth() {
        let config = ChartConfig {
            smooth_frames: 1,
            ..Default::default()
        };
        let frames = vec![
            PitchFrame::new(0.0, 220.0, 1.0),
            PitchFrame::new(0.01, 220.0, 1.0),
            PitchFrame::new(0.02, 440.0, 1.0), // tracker octave error
            PitchFrame::new(0.03, 220.0, 1.0),
            PitchFrame::new(0.04, 0.0, 0.0),
        ];
        let out = condition(&frames, &config);
        assert_eq!(out.len(), frames.len());
        for f in &out[..4] {
            assert!((f.midi.unwrap() - 57.0).abs() < 1e-4);
        }
        assert_eq!(out[4].midi, None);
    }
}
