//! Adjacent note merging

use crate::analysis::result::Note;
use crate::trace::{span_duration, TIME_EPSILON};

/// Merge neighbouring notes that are close in time and pitch
///
/// Scans left to right; note `i + 1` is folded into the note being built when
/// `start(i + 1) - end(i) <= max_gap` and their pitches differ by at most
/// `pitch_tolerance`. The merged note runs to the later end and takes the
/// duration-weighted mean pitch, so a chain of qualifying neighbours collapses
/// into one note.
///
/// Because a merge moves the pitch of the surviving note, a single scan can
/// leave a pair that now qualifies. Scans repeat until nothing changes, which
/// makes the result a fixed point: merging it again is a no-op.
///
/// # Arguments
///
/// * `notes` - Time-ordered, non-overlapping notes
/// * `max_gap` - Largest silence bridged, in seconds
/// * `pitch_tolerance` - Largest pitch difference merged, in semitones
///
/// # Returns
///
/// Merged notes with lanes cleared
pub fn merge_adjacent(notes: &[Note], max_gap: f32, pitch_tolerance: f32) -> Vec<Note> {
    log::debug!(
        "Merging {} notes (max_gap={:.3}s, pitch_tolerance={:.2})",
        notes.len(),
        max_gap,
        pitch_tolerance
    );

    let mut current = merge_pass(notes, max_gap, pitch_tolerance);
    let mut passes = 1;
    loop {
        let next = merge_pass(&current, max_gap, pitch_tolerance);
        if next.len() == current.len() {
            break;
        }
        current = next;
        passes += 1;
    }

    log::debug!("Merged into {} notes after {} passes", current.len(), passes);
    current
}

fn merge_pass(notes: &[Note], max_gap: f32, pitch_tolerance: f32) -> Vec<Note> {
    let mut merged: Vec<Note> = Vec::with_capacity(notes.len());

    for note in notes {
        if let Some(prev) = merged.last_mut() {
            let gap = note.start - prev.end();
            let close_time = gap <= max_gap + TIME_EPSILON;
            let close_pitch = (note.midi - prev.midi).abs() <= pitch_tolerance;
            if close_time && close_pitch {
                *prev = join(prev, note);
                continue;
            }
        }
        merged.push(Note { lane: None, ..*note });
    }

    merged
}

/// Join two notes into one spanning both, duration-weighted pitch
fn join(a: &Note, b: &Note) -> Note {
    let end = a.end().max(b.end());
    let weight = a.duration + b.duration;
    let midi = if weight > 0.0 {
        (a.midi * a.duration + b.midi * b.duration) / weight
    } else {
        (a.midi + b.midi) * 0.5
    };
    Note {
        start: a.start,
        duration: span_duration(a.start, end),
        midi,
        lane: None,
    }
}

/// Drop notes shorter than `min_duration` and bring the survivors up to it
///
/// A note within `TIME_EPSILON` of the minimum is kept and lengthened to
/// exactly `min_duration`. When that runs into the next note, the next note's
/// start moves to the new end and its own end stays put. Everything else
/// shorter than the minimum is discarded.
///
/// # Returns
///
/// Time-ordered, non-overlapping notes, each at least `min_duration` long
pub fn enforce_min_duration(notes: &[Note], min_duration: f32) -> Vec<Note> {
    let mut kept: Vec<Note> = notes
        .iter()
        .filter(|n| n.duration + TIME_EPSILON >= min_duration)
        .copied()
        .collect();

    let mut padded = 0usize;
    for i in 0..kept.len() {
        if kept[i].duration >= min_duration {
            continue;
        }
        kept[i].duration = min_duration;
        padded += 1;

        let end = kept[i].end();
        if let Some(next) = kept.get_mut(i + 1) {
            if next.start < end {
                let next_end = next.end();
                next.start = end;
                next.duration = span_duration(end, next_end);
            }
        }
    }

    log::debug!(
        "Kept {} of {} notes at >= {:.3}s ({} padded to the minimum)",
        kept.len(),
        notes.len(),
        min_duration,
        padded
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: f32, duration: f32, midi: f32) -> Note {
        Note {
            start,
            duration,
            midi,
            lane: None,
        }
    }

    #[test]
    fn test_merges_close_same_pitch() {
        let notes = vec![note(0.0, 0.5, 60.0), note(0.55, 0.5, 60.5)];
        let merged = merge_adjacent(&notes, 0.15, 0.5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start, 0.0);
        assert!((merged[0].end() - 1.05).abs() < 1e-5);
        assert!((merged[0].midi - 60.25).abs() < 1e-5);
    }

    #[test]
    fn test_keeps_far_or_different_notes() {
        let notes = vec![
            note(0.0, 0.5, 60.0),
            note(1.0, 0.5, 60.0), // gap too large
            note(1.55, 0.5, 64.0), // pitch too far
        ];
        assert_eq!(merge_adjacent(&notes, 0.15, 0.5).len(), 3);
    }

    #[test]
    fn test_chain_collapses() {
        let notes = vec![
            note(0.0, 0.2, 60.0),
            note(0.25, 0.2, 60.0),
            note(0.5, 0.2, 60.0),
            note(0.75, 0.2, 60.0),
        ];
        let merged = merge_adjacent(&notes, 0.1, 0.5);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].duration - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_weighted_pitch() {
        let notes = vec![note(0.0, 0.3, 60.0), note(0.3, 0.1, 60.4)];
        let merged = merge_adjacent(&notes, 0.0, 0.5);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].midi - 60.1).abs() < 1e-4);
    }

    #[test]
    fn test_result_is_fixed_point() {
        // The first scan only joins 60.6 with 60.4; the result then sits
        // within tolerance of the leading 60.0
        let notes = vec![
            note(0.0, 0.2, 60.0),
            note(0.25, 0.2, 60.6),
            note(0.5, 1.0, 60.4),
        ];
        let once = merge_adjacent(&notes, 0.1, 0.5);
        let twice = merge_adjacent(&once, 0.1, 0.5);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(merge_adjacent(&[], 0.1, 0.5).is_empty());
        assert!(enforce_min_duration(&[], 0.1).is_empty());
    }

    #[test]
    fn test_enforce_min_duration_drops_short() {
        let notes = vec![note(0.0, 0.05, 60.0), note(0.5, 0.5, 62.0)];
        let kept = enforce_min_duration(&notes, 0.1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, 0.5);
    }

    #[test]
    fn test_enforce_min_duration_pads_near_misses() {
        // Ten 10 ms frames summed in f32 land just under 0.1 s, touching the
        // following note
        let start = 3.7f32;
        let end = (0..10).fold(start, |t, _| t + 0.01);
        let first = note(start, span_duration(start, end), 60.0);
        let second = note(end, span_duration(end, end + 0.1), 62.0);
        let third = note(end + 0.5, 0.09995, 64.0);

        let kept = enforce_min_duration(&[first, second, third], 0.1);
        assert_eq!(kept.len(), 3);
        for n in &kept {
            assert!(n.duration >= 0.1, "Short note: {:?}", n);
        }
        for pair in kept.windows(2) {
            assert!(pair[0].end() <= pair[1].start, "Overlap: {:?}", pair);
        }
        assert_eq!(kept[2].duration, 0.1);
    }
}
