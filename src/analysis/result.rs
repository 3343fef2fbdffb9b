//! Chart result types

use crate::trace::span_duration;
use serde::{Deserialize, Serialize};

/// A note candidate cut from the MIDI trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteCandidate {
    /// Start time in seconds
    pub start: f32,

    /// End time in seconds (always greater than `start`)
    pub end: f32,

    /// Representative MIDI pitch
    pub midi: f32,
}

impl NoteCandidate {
    /// Length in seconds; `start + duration()` never passes `end`
    pub fn duration(&self) -> f32 {
        span_duration(self.start, self.end)
    }
}

/// A playable note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Start time in seconds
    pub start: f32,

    /// Length in seconds (> 0)
    pub duration: f32,

    /// Representative MIDI pitch
    pub midi: f32,

    /// Lane index in `[0, lanes)`, `None` until lanes are assigned
    pub lane: Option<u32>,
}

impl Note {
    /// End time in seconds
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

impl From<NoteCandidate> for Note {
    fn from(candidate: NoteCandidate) -> Self {
        Self {
            start: candidate.start,
            duration: candidate.duration(),
            midi: candidate.midi,
            lane: None,
        }
    }
}

/// One point of the pitch trace kept alongside the notes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    /// Time in seconds
    pub time: f32,

    /// MIDI pitch, `None` when unvoiced
    pub midi: Option<f32>,
}

/// Chart metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Detector window in samples (as configured)
    pub window_size: usize,

    /// Detector hop in samples (as configured)
    pub hop_size: usize,

    /// Hop interval inferred from the frame timestamps, in seconds
    pub hop_seconds: f32,

    /// Number of input frames
    pub frame_count: usize,

    /// Frames voiced after conditioning
    pub voiced_frame_count: usize,

    /// Median note pitch used as the center lane, `None` without notes
    pub reference_pitch: Option<f32>,
}

/// Complete chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Track name
    pub name: String,

    /// Track length in seconds
    pub length: f32,

    /// Number of lanes (`2 * lane_range + 1`)
    pub lanes: u32,

    /// Notes in time order, never overlapping
    pub notes: Vec<Note>,

    /// Pitch trace the notes were cut from, one record per input frame
    pub pitches: Vec<PitchRecord>,

    /// Chart metadata
    pub metadata: ChartMetadata,
}

impl Chart {
    /// True when no note survived (a degenerate but valid chart)
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_from_candidate() {
        let note = Note::from(NoteCandidate {
            start: 1.0,
            end: 1.5,
            midi: 62.5,
        });
        assert_eq!(note.start, 1.0);
        assert_eq!(note.duration, 0.5);
        assert_eq!(note.lane, None);
        assert_eq!(note.end(), 1.5);
    }
}
