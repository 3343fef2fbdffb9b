//! Note segmentation
//!
//! Cuts the gap-filled MIDI trace into note candidates. A candidate opens on
//! every unvoiced-to-voiced transition and closes on voiced-to-unvoiced or on
//! a pitch move of more than `hold_tolerance` away from the value the
//! candidate opened with. By this point the hold engine has flattened
//! detector noise, so any surviving move is a real pitch change.

use crate::analysis::result::NoteCandidate;
use crate::config::PitchRounding;
use crate::trace::{frame_end, MidiFrame, TIME_EPSILON};

/// Running accumulation of one voiced run
#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start: f32,
    anchor: f32,
    weighted_sum: f32,
    weight: f32,
}

impl OpenRun {
    fn open(start: f32, midi: f32, span: f32) -> Self {
        Self {
            start,
            anchor: midi,
            weighted_sum: midi * span,
            weight: span,
        }
    }

    fn extend(&mut self, midi: f32, span: f32) {
        self.weighted_sum += midi * span;
        self.weight += span;
    }

    fn close(self, end: f32, rounding: PitchRounding) -> Option<NoteCandidate> {
        if end <= self.start {
            return None;
        }
        let mean = if self.weight > 0.0 {
            self.weighted_sum / self.weight
        } else {
            self.anchor
        };
        Some(NoteCandidate {
            start: self.start,
            end,
            midi: rounding.apply(mean),
        })
    }
}

/// Cut a MIDI trace into note candidates
///
/// # Arguments
///
/// * `frames` - Gap-filled MIDI frames
/// * `hop_seconds` - Hop interval, used to close a run that reaches the last frame
/// * `hold_tolerance` - Pitch move that closes the current candidate
/// * `rounding` - Rounding applied to the time-weighted mean pitch
///
/// # Returns
///
/// Time-ordered, non-overlapping candidates. A candidate spans from its first
/// frame to the start of the frame that closed it.
pub fn segment_notes(
    frames: &[MidiFrame],
    hop_seconds: f32,
    hold_tolerance: f32,
    rounding: PitchRounding,
) -> Vec<NoteCandidate> {
    log::debug!(
        "Segmenting {} frames (hop={:.4}s, tolerance={:.2})",
        frames.len(),
        hop_seconds,
        hold_tolerance
    );

    let mut candidates = Vec::new();
    let mut current: Option<OpenRun> = None;

    for (i, frame) in frames.iter().enumerate() {
        let span = frame_end(frames, i, hop_seconds) - frame.time;

        match (current.as_mut(), frame.midi) {
            (None, Some(midi)) => {
                current = Some(OpenRun::open(frame.time, midi, span));
            }
            (Some(run), Some(midi)) => {
                if (midi - run.anchor).abs() <= hold_tolerance {
                    run.extend(midi, span);
                } else {
                    let closed = *run;
                    candidates.extend(closed.close(frame.time, rounding));
                    current = Some(OpenRun::open(frame.time, midi, span));
                }
            }
            (Some(run), None) => {
                let closed = *run;
                candidates.extend(closed.close(frame.time, rounding));
                current = None;
            }
            (None, None) => {}
        }
    }

    if let (Some(run), Some(last)) = (current, frames.last()) {
        candidates.extend(run.close(last.time + hop_seconds, rounding));
    }

    log::debug!("Segmented {} note candidates", candidates.len());
    candidates
}

/// Drop candidates shorter than `min_duration`
///
/// Short candidates are detection noise; they are discarded, never folded
/// into a neighbor.
pub fn discard_short(candidates: &[NoteCandidate], min_duration: f32) -> Vec<NoteCandidate> {
    let kept: Vec<NoteCandidate> = candidates
        .iter()
        .filter(|c| c.duration() + TIME_EPSILON >= min_duration)
        .copied()
        .collect();
    log::debug!(
        "Discarded {} of {} candidates shorter than {:.3}s",
        candidates.len() - kept.len(),
        candidates.len(),
        min_duration
    );
    kept
}
