//! Phrase grouping and duration stretch
//!
//! Phrases only exist while stretching: consecutive notes are grouped while
//! the silence between them and the pitch range of the group stay small, each
//! phrase gets a stretch factor, and the notes come back out as one flat,
//! time-ordered sequence.

use crate::analysis::result::Note;
use crate::config::PhraseRange;
use crate::trace::{span_duration, TIME_EPSILON};

/// A run of notes grouped by silence and pitch proximity
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    /// Member notes in time order
    pub notes: Vec<Note>,

    /// Duration multiplier for every member
    pub stretch_factor: f32,
}

impl Phrase {
    fn new(first: Note, stretch_factor: f32) -> Self {
        Self {
            notes: vec![first],
            stretch_factor,
        }
    }

    /// Lowest and highest member pitch
    pub fn pitch_bounds(&self) -> (f32, f32) {
        self.notes
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), n| {
                (lo.min(n.midi), hi.max(n.midi))
            })
    }

    /// Mean member pitch
    pub fn mean_pitch(&self) -> f32 {
        self.notes.iter().map(|n| n.midi).sum::<f32>() / self.notes.len() as f32
    }

    fn end(&self) -> f32 {
        self.notes.last().map(|n| n.end()).unwrap_or(0.0)
    }

    /// True when `note` can join without breaking the gap or pitch bounds
    fn accepts(&self, note: &Note, max_gap: f32, pitch_tolerance: f32, range: PhraseRange) -> bool {
        if note.start - self.end() > max_gap + TIME_EPSILON {
            return false;
        }
        match range {
            PhraseRange::AbsoluteSpan => {
                let (lo, hi) = self.pitch_bounds();
                hi.max(note.midi) - lo.min(note.midi) <= pitch_tolerance
            }
            PhraseRange::RollingMean => (note.midi - self.mean_pitch()).abs() <= pitch_tolerance,
        }
    }
}

/// Group notes into phrases
///
/// # Arguments
///
/// * `notes` - Time-ordered notes
/// * `phrase_gap` - Largest silence inside a phrase, in seconds
/// * `pitch_tolerance` - Largest pitch range inside a phrase, in semitones
/// * `range` - How the pitch range is measured
/// * `stretch_factor` - Factor assigned to every phrase
pub fn group_phrases(
    notes: &[Note],
    phrase_gap: f32,
    pitch_tolerance: f32,
    range: PhraseRange,
    stretch_factor: f32,
) -> Vec<Phrase> {
    let mut phrases: Vec<Phrase> = Vec::new();

    for note in notes {
        match phrases.last_mut() {
            Some(phrase) if phrase.accepts(note, phrase_gap, pitch_tolerance, range) => {
                phrase.notes.push(*note);
            }
            _ => phrases.push(Phrase::new(*note, stretch_factor)),
        }
    }

    log::debug!("Grouped {} notes into {} phrases", notes.len(), phrases.len());
    phrases
}

/// Stretch every note by its phrase factor and flatten back to notes
///
/// Each note grows forward from its own start. A stretched note is capped so
/// it ends no later than the next note starts, whether that note is in the
/// same phrase or opens the next one; the last note is capped at
/// `track_end`. Notes are never reordered or dropped.
pub fn stretch_phrases(phrases: &[Phrase], track_end: f32) -> Vec<Note> {
    let flat: Vec<(Note, f32)> = phrases
        .iter()
        .flat_map(|p| p.notes.iter().map(move |n| (*n, p.stretch_factor)))
        .collect();

    let mut capped = 0usize;
    let stretched: Vec<Note> = flat
        .iter()
        .enumerate()
        .map(|(i, (note, factor))| {
            let mut duration = note.duration * factor;
            let limit = flat.get(i + 1).map(|(next, _)| next.start).unwrap_or(track_end);
            let room = span_duration(note.start, limit).max(note.duration);
            if duration > room {
                duration = room;
                capped += 1;
            }
            Note { duration, ..*note }
        })
        .collect();

    log::debug!(
        "Stretched {} notes across {} phrases ({} capped at the next onset)",
        stretched.len(),
        phrases.len(),
        capped
    );
    stretched
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
    fn test_grouping_by_gap() {
        let notes = vec![
            note(0.0, 0.5, 60.0),
            note(0.6, 0.5, 62.0),
            note(2.0, 0.5, 62.0), // long silence
        ];
        let phrases = group_phrases(&notes, 0.3, 5.0, PhraseRange::AbsoluteSpan, 1.0);
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].notes.len(), 2);
    }

    #[test]
    fn test_grouping_by_absolute_span() {
        let notes = vec![
            note(0.0, 0.2, 60.0),
            note(0.2, 0.2, 63.0),
            note(0.4, 0.2, 66.0), // span 6 > 5
        ];
        let phrases = group_phrases(&notes, 0.3, 5.0, PhraseRange::AbsoluteSpan, 1.0);
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[1].notes[0].midi, 66.0);
    }

    #[test]
    fn test_grouping_by_rolling_mean() {
        let notes = vec![
            note(0.0, 0.2, 60.0),
            note(0.2, 0.2, 63.0),
            note(0.4, 0.2, 66.0), // 4.5 from mean 61.5
        ];
        let phrases = group_phrases(&notes, 0.3, 5.0, PhraseRange::RollingMean, 1.0);
        assert_eq!(phrases.len(), 1);
    }

    #[test]
    fn test_stretch_forward_from_start() {
        let phrases = vec![Phrase {
            notes: vec![note(1.0, 0.2, 60.0)],
            stretch_factor: 1.5,
        }];
        let out = stretch_phrases(&phrases, 10.0);
        assert_eq!(out[0].start, 1.0);
        assert!((out[0].duration - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_stretch_capped_at_next_onset() {
        let phrases = vec![Phrase {
            notes: vec![note(0.0, 0.4, 60.0), note(0.5, 0.4, 62.0)],
            stretch_factor: 2.0,
        }];
        let out = stretch_phrases(&phrases, 10.0);
        assert!((out[0].duration - 0.5).abs() < 1e-6);
        assert!((out[1].duration - 0.8).abs() < 1e-6);
        assert!(out[0].end() <= out[1].start);
    }

    #[test]
    fn test_stretch_capped_across_phrases() {
        let phrases = vec![
            Phrase {
                notes: vec![note(0.0, 0.4, 60.0)],
                stretch_factor: 2.0,
            },
            Phrase {
                notes: vec![note(0.5, 0.4, 70.0)],
                stretch_factor: 2.0,
            },
        ];
        let out = stretch_phrases(&phrases, 10.0);
        assert!(out[0].end() <= out[1].start + 1e-6);
    }

    #[test]
    fn test_last_note_capped_at_track_end() {
        let phrases = vec![Phrase {
            notes: vec![note(1.0, 0.5, 60.0)],
            stretch_factor: 3.0,
        }];
        let out = stretch_phrases(&phrases, 2.0);
        assert!((out[0].end() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_bounds_and_mean() {
        let phrase = Phrase {
            notes: vec![note(0.0, 0.1, 60.0), note(0.1, 0.1, 64.0)],
            stretch_factor: 1.0,
        };
        assert_eq!(phrase.pitch_bounds(), (60.0, 64.0));
        assert_eq!(phrase.mean_pitch(), 62.0);
    }
}
