//! Lane mapping relative to the track's median pitch

use crate::analysis::result::Note;

/// Median note pitch (mean of the two middle values for an even count)
///
/// Returns `None` for an empty slice.
pub fn median_pitch(notes: &[Note]) -> Option<f32> {
    if notes.is_empty() {
        return None;
    }

    let mut pitches: Vec<f32> = notes.iter().map(|n| n.midi).collect();
    pitches.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = pitches.len() / 2;
    if pitches.len() % 2 == 0 {
        Some((pitches[mid - 1] + pitches[mid]) * 0.5)
    } else {
        Some(pitches[mid])
    }
}

/// Lane index of a pitch
///
/// The semitone offset from `reference` is rounded, clamped to
/// `[-lane_range, lane_range]`, and shifted so the center lane is
/// `lane_range`. Out-of-range pitches land on the outermost lane.
pub fn lane_for(midi: f32, reference: f32, lane_range: u32) -> u32 {
    let range = lane_range as i64;
    let offset = ((midi - reference).round() as i64).clamp(-range, range);
    (offset + range) as u32
}

/// Assign a lane to every note
///
/// # Returns
///
/// The notes with `lane` set, plus the reference (median) pitch; `None` when
/// there are no notes.
pub fn assign_lanes(notes: &[Note], lane_range: u32) -> (Vec<Note>, Option<f32>) {
    let Some(reference) = median_pitch(notes) else {
        return (Vec::new(), None);
    };

    log::debug!(
        "Mapping {} notes to {} lanes around reference pitch {:.2}",
        notes.len(),
        lane_range * 2 + 1,
        reference
    );

    let mapped = notes
        .iter()
        .map(|n| Note {
            lane: Some(lane_for(n.midi, reference, lane_range)),
            ..*n
        })
        .collect();

    (mapped, Some(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_at(midi: f32) -> Note {
        Note {
            start: 0.0,
            duration: 0.1,
            midi,
            lane: None,
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        let odd: Vec<Note> = [62.0, 60.0, 64.0].iter().map(|&m| note_at(m)).collect();
        assert_eq!(median_pitch(&odd), Some(62.0));

        let even: Vec<Note> = [60.0, 61.0, 65.0, 70.0].iter().map(|&m| note_at(m)).collect();
        assert_eq!(median_pitch(&even), Some(63.0));

        assert_eq!(median_pitch(&[]), None);
    }

    #[test]
    fn test_center_and_clamp() {
        assert_eq!(lane_for(60.0, 60.0, 4), 4);
        assert_eq!(lane_for(62.0, 60.0, 4), 6);
        assert_eq!(lane_for(66.0, 60.0, 4), 8);
        assert_eq!(lane_for(40.0, 60.0, 4), 0);
        assert_eq!(lane_for(59.4, 60.0, 4), 3);
    }

    #[test]
    fn test_assign_lanes_bounds() {
        let notes: Vec<Note> = [48.0, 60.0, 60.0, 61.5, 80.0]
            .iter()
            .map(|&m| note_at(m))
            .collect();
        let (mapped, reference) = assign_lanes(&notes, 2);
        assert_eq!(reference, Some(60.0));
        for n in &mapped {
            let lane = n.lane.unwrap();
            assert!(lane < 5);
        }
        assert_eq!(mapped[0].lane, Some(0));
        assert_eq!(mapped[4].lane, Some(4));
    }

    #[test]
    fn test_assign_lanes_empty() {
        let (mapped, reference) = assign_lanes(&[], 4);
        assert!(mapped.is_empty());
        assert_eq!(reference, None);
    }
}
