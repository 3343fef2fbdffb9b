//! # notechart
//!
//! Turns a pitch trace (frequency + confidence per hop, from any external
//! pitch detector) into a quantized, lane-mapped sequence of rhythm-game
//! notes.
//!
//! ## Features
//!
//! - **Conditioning**: voicing window, octave-jump correction, voiced-only smoothing
//! - **Stability**: pitch hold with stability hysteresis, micro-gap filling
//! - **Notes**: segmentation, adjacent merging, phrase stretch, final consolidation
//! - **Lanes**: median-relative lane mapping with clamping
//!
//! ## Quick Start
//!
//! ```no_run
//! use notechart::{generate_chart, ChartConfig, PitchFrame};
//!
//! // Pitch estimates from your detector, one per hop
//! let frames: Vec<PitchFrame> = vec![]; // Your pitch trace
//!
//! let chart = generate_chart("my-song", &frames, &ChartConfig::default())?;
//!
//! println!("{} notes over {:.1}s in {} lanes", chart.notes.len(), chart.length, chart.lanes);
//! # Ok::<(), notechart::ChartError>(())
//! ```
//!
//! ## Architecture
//!
//! Every stage is a pure function over the previous stage's output:
//!
//! ```text
//! PitchFrame → Conditioning → Hold → Gap Fill → Segmentation → Merge
//!            → Phrase Stretch → Final Merge → Lane Mapping → Chart
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;
pub mod trace;

// Re-export main types
pub use analysis::result::{Chart, ChartMetadata, Note, NoteCandidate, PitchRecord};
pub use analysis::summary::{compute_summary, ChartFlag, ChartSummary};
pub use config::{ChartConfig, PhraseRange, PitchRounding};
pub use error::ChartError;
pub use trace::{MidiFrame, PitchFrame};

use features::notes::{
    assign_lanes, discard_short, enforce_min_duration, group_phrases, merge_adjacent,
    segment_notes, stretch_phrases,
};
use features::stability::{apply_hold, fill_micro_gaps};

/// Main chart generation function
///
/// Runs the whole pipeline over one track's pitch trace.
///
/// # Arguments
///
/// * `name` - Track name, copied into the chart
/// * `frames` - Pitch estimates in time order, one per hop
/// * `config` - Generation parameters
///
/// # Returns
///
/// The finished `Chart`. A track with no voiced frames, or whose notes are all
/// too short, yields a chart with an empty note list and the full pitch trace.
///
/// # Errors
///
/// - `ChartError::InvalidConfig` if an option is out of range
/// - `ChartError::InvalidInput` if the trace is empty or malformed
///
/// Both are checked before any stage runs.
///
/// # Example
///
/// ```
/// use notechart::{generate_chart, ChartConfig, PitchFrame};
///
/// // Two seconds of A3 at a 10 ms hop
/// let frames: Vec<PitchFrame> = (0..200)
///     .map(|i| PitchFrame::new(i as f32 * 0.01, 220.0, 0.9))
///     .collect();
///
/// let chart = generate_chart("a3", &frames, &ChartConfig::default())?;
/// assert_eq!(chart.notes.len(), 1);
/// assert_eq!(chart.notes[0].lane, Some(4));
/// # Ok::<(), notechart::ChartError>(())
/// ```
pub fn generate_chart(
    name: &str,
    frames: &[PitchFrame],
    config: &ChartConfig,
) -> Result<Chart, ChartError> {
    log::debug!("Generating chart '{}' from {} frames", name, frames.len());

    config.validate()?;
    trace::validate_frames(frames)?;

    let times: Vec<f32> = frames.iter().map(|f| f.time).collect();
    let hop_seconds = trace::infer_hop_seconds(&times);
    let length = times[times.len() - 1] + hop_seconds;

    // 1. Conditioning
    let conditioned = preprocessing::condition(frames, config);
    let voiced_frame_count = conditioned.iter().filter(|f| f.is_voiced()).count();
    if voiced_frame_count == 0 {
        log::warn!("Chart '{}': no voiced frames, chart will be empty", name);
    }

    // 2. Stability
    let held = apply_hold(&conditioned, config.stability_frames, config.hold_tolerance);
    let filled = fill_micro_gaps(&held, config.max_gap_fill, config.hold_tolerance);

    // 3. Segmentation + first merge
    let candidates = segment_notes(
        &filled,
        hop_seconds,
        config.hold_tolerance,
        config.pitch_rounding,
    );
    let candidates = discard_short(&candidates, config.min_note_duration);
    let notes: Vec<Note> = candidates.into_iter().map(Note::from).collect();
    let notes = merge_adjacent(&notes, config.merge_gap, config.note_pitch_tolerance);

    // 4. Phrases
    let phrases = group_phrases(
        &notes,
        config.phrase_gap,
        config.phrase_pitch_tolerance,
        config.phrase_range,
        config.stretch_factor,
    );
    let stretched = stretch_phrases(&phrases, length);

    // 5. Final whole-track merge
    let notes = merge_adjacent(&stretched, config.final_merge_gap, config.note_pitch_tolerance);
    let notes = enforce_min_duration(&notes, config.min_note_duration);

    // 6. Lanes
    let (notes, reference_pitch) = assign_lanes(&notes, config.lane_range);

    if let Some(bad) = notes
        .iter()
        .find(|n| !(n.start.is_finite() && n.duration.is_finite() && n.midi.is_finite()))
    {
        return Err(ChartError::NumericalError(format!(
            "Non-finite note produced: {:?}",
            bad
        )));
    }

    log::debug!(
        "Chart '{}': {} notes, {} lanes, reference pitch {:?}",
        name,
        notes.len(),
        config.lane_count(),
        reference_pitch
    );

    Ok(Chart {
        name: name.to_string(),
        length,
        lanes: config.lane_count(),
        notes,
        pitches: filled
            .iter()
            .map(|f| PitchRecord {
                time: f.time,
                midi: f.midi,
            })
            .collect(),
        metadata: ChartMetadata {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            window_size: config.window_size,
            hop_size: config.hop_size,
            hop_seconds,
            frame_count: frames.len(),
            voiced_frame_count,
            reference_pitch,
        },
    })
}
