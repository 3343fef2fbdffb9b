//! Note extraction
//!
//! - Segmentation of the MIDI trace into note candidates
//! - Adjacent merging (first pass and final whole-track pass)
//! - Phrase grouping and stretch
//! - Lane mapping

pub mod lanes;
pub mod merge;
pub mod phrase;
pub mod segmenter;

pub use lanes::{assign_lanes, lane_for, median_pitch};
pub use merge::{enforce_min_duration, merge_adjacent};
pub use phrase::{group_phrases, stretch_phrases, Phrase};
pub use segmenter::{discard_short, segment_notes};
