//! Micro-gap filling

use crate::trace::{MidiFrame, TIME_EPSILON};

/// Bridge short unvoiced gaps inside a continuous pitch run
///
/// Every maximal run of unvoiced frames with voiced frames on both sides is
/// filled with the left-hand pitch when
/// - the gap lasts at most `max_gap` seconds (from the first unvoiced frame
///   to the next voiced one), and
/// - the pitches on either side differ by at most `hold_tolerance`.
///
/// Leading and trailing silence, long gaps, and gaps across a pitch change
/// stay unvoiced and later become note boundaries.
pub fn fill_micro_gaps(frames: &[MidiFrame], max_gap: f32, hold_tolerance: f32) -> Vec<MidiFrame> {
    log::debug!(
        "Filling micro-gaps in {} frames (max_gap={:.3}s, tolerance={:.2})",
        frames.len(),
        max_gap,
        hold_tolerance
    );

    let mut out = frames.to_vec();
    let mut filled_gaps = 0usize;
    let mut i = 0;

    while i < frames.len() {
        if frames[i].is_voiced() {
            i += 1;
            continue;
        }

        let gap_start = i;
        while i < frames.len() && !frames[i].is_voiced() {
            i += 1;
        }
        let gap_end = i; // first voiced frame after the gap, or len

        if gap_start == 0 || gap_end == frames.len() {
            continue;
        }

        let (Some(left), Some(right)) = (frames[gap_start - 1].midi, frames[gap_end].midi) else {
            continue;
        };

        let duration = frames[gap_end].time - frames[gap_start].time;
        if duration <= max_gap + TIME_EPSILON && (left - right).abs() <= hold_tolerance {
            for frame in &mut out[gap_start..gap_end] {
                frame.midi = Some(left);
            }
            filled_gaps += 1;
        }
    }

    log::debug!("Filled {} micro-gaps", filled_gaps);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(values: &[Option<f32>]) -> Vec<MidiFrame> {
        values
            .iter()
            .enumerate()
            .map(|(i, &m)| MidiFrame {
                time: i as f32 * 0.01,
                midi: m,
            })
            .collect()
    }

    #[test]
    fn test_short_gap_same_pitch_filled() {
        let frames = trace(&[Some(60.0), None, None, Some(60.0)]);
        let out = fill_micro_gaps(&frames, 0.05, 0.5);
        assert!(out.iter().all(|f| f.midi == Some(60.0)));
    }

    #[test]
    fn test_gap_across_pitch_change_kept() {
        let frames = trace(&[Some(60.0), None, Some(62.0)]);
        let out = fill_micro_gaps(&frames, 0.05, 0.5);
        assert_eq!(out[1].midi, None);
    }

    #[test]
    fn test_long_gap_kept() {
        let mut values = vec![Some(60.0)];
        values.extend(std::iter::repeat(None).take(20));
        values.push(Some(60.0));
        let frames = trace(&values);
        let out = fill_micro_gaps(&frames, 0.1, 0.5);
        assert!(out[1..21].iter().all(|f| f.midi.is_none()));
    }

    #[test]
    fn test_gap_at_threshold_filled() {
        // Five unvoiced frames at 10 ms = 0.05 s
        let mut values = vec![Some(60.0)];
        values.extend(std::iter::repeat(None).take(5));
        values.push(Some(60.0));
        let out = fill_micro_gaps(&trace(&values), 0.05, 0.5);
        assert!(out.iter().all(|f| f.is_voiced()));
    }

    #[test]
    fn test_edges_not_filled() {
        let frames = trace(&[None, Some(60.0), None]);
        let out = fill_micro_gaps(&frames, 1.0, 0.5);
        assert_eq!(out[0].midi, None);
        assert_eq!(out[2].midi, None);
    }
}
