//! Octave-jump correction
//!
//! Pitch trackers regularly lock onto a harmonic or sub-harmonic for a few
//! frames, which shows up as a jump of exactly one (or more) octaves. Each
//! voiced frame is compared against the median of a short trailing window of
//! already-accepted pitches; a candidate that sits an integer number of
//! octaves away (within `tolerance` semitones after folding) is snapped back
//! by `12 * k` semitones. Any other pitch change passes through untouched.
//!
//! The reference window is cleared at every unvoiced frame, so a new voiced
//! run is free to start in any octave.

use crate::trace::MidiFrame;
use std::collections::VecDeque;

/// Semitones per octave
const OCTAVE: f32 = 12.0;

/// Correct octave jumps against a trailing reference window
///
/// # Arguments
///
/// * `frames` - MIDI frames (unvoiced frames pass through)
/// * `window` - Number of trailing accepted pitches forming the reference
/// * `tolerance` - Maximum distance from an exact octave multiple, in semitones
///
/// # Returns
///
/// Frames of the same length and timing with octave jumps folded back
pub fn correct_octaves(frames: &[MidiFrame], window: usize, tolerance: f32) -> Vec<MidiFrame> {
    log::debug!(
        "Correcting octaves over {} frames (window={}, tolerance={:.2})",
        frames.len(),
        window,
        tolerance
    );

    let window = window.max(1);
    let mut recent: VecDeque<f32> = VecDeque::with_capacity(window);
    let mut corrected_count = 0usize;

    let out = frames
        .iter()
        .map(|frame| {
            let Some(midi) = frame.midi else {
                recent.clear();
                return *frame;
            };

            let accepted = match reference_pitch(&recent) {
                Some(reference) => {
                    let folded = fold_octave(midi, reference, tolerance);
                    if folded != midi {
                        corrected_count += 1;
                    }
                    folded
                }
                None => midi,
            };

            if recent.len() == window {
                recent.pop_front();
            }
            recent.push_back(accepted);

            MidiFrame::voiced(frame.time, accepted)
        })
        .collect();

    log::debug!("Octave-corrected {} frames", corrected_count);
    out
}

/// Snap `midi` by whole octaves towards `reference` when it sits an octave
/// multiple away
fn fold_octave(midi: f32, reference: f32, tolerance: f32) -> f32 {
    let diff = midi - reference;
    let octaves = (diff / OCTAVE).round();
    if octaves != 0.0 && (diff - octaves * OCTAVE).abs() <= tolerance {
        midi - octaves * OCTAVE
    } else {
        midi
    }
}

/// Median of the reference window
fn reference_pitch(recent: &VecDeque<f32>) -> Option<f32> {
    if recent.is_empty() {
        return None;
    }
    let mut sorted: Vec<f32> = recent.iter().copied().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) * 0.5)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voiced(values: &[f32]) -> Vec<MidiFrame> {
        values
            .iter()
            .enumerate()
            .map(|(i, &m)| MidiFrame::voiced(i as f32 * 0.01, m))
            .collect()
    }

    #[test]
    fn test_single_octave_jump_is_folded() {
        let frames = voiced(&[60.0, 60.0, 60.0, 72.0, 60.0]);
        let out = correct_octaves(&frames, 5, 0.5);
        assert_eq!(out[3].midi, Some(60.0));
    }

    #[test]
    fn test_sub_harmonic_jump_is_folded() {
        let frames = voiced(&[64.0, 64.1, 52.2, 64.0]);
        let out = correct_octaves(&frames, 5, 0.5);
        let m = out[2].midi.unwrap();
        assert!((m - 64.2).abs() < 1e-4, "got {}", m);
    }

    #[test]
    fn test_real_interval_is_kept() {
        // A fifth is not an octave artifact
        let frames = voiced(&[60.0, 60.0, 67.0, 67.0]);
        let out = correct_octaves(&frames, 5, 0.5);
        assert_eq!(out[2].midi, Some(67.0));
        assert_eq!(out[3].midi, Some(67.0));
    }

    #[test]
    fn test_off_octave_beyond_tolerance_is_kept() {
        let frames = voiced(&[60.0, 60.0, 71.0]);
        let out = correct_octaves(&frames, 5, 0.5);
        assert_eq!(out[2].midi, Some(71.0));
    }

    #[test]
    fn test_unvoiced_resets_reference() {
        let mut frames = voiced(&[60.0, 60.0, 72.0, 72.0]);
        frames[2] = MidiFrame::unvoiced(0.02);
        let out = correct_octaves(&frames, 5, 0.5);
        assert_eq!(out[2].midi, None);
        // New run after silence may start an octave up
        assert_eq!(out[3].midi, Some(72.0));
    }

    #[test]
    fn test_preserves_length_and_timing() {
        let frames = voiced(&[60.0, 72.0, 48.0]);
        let out = correct_octaves(&frames, 3, 0.5);
        assert_eq!(out.len(), frames.len());
        for (a, b) in frames.iter().zip(out.iter()) {
            assert_eq!(a.time, b.time);
        }
    }
}
