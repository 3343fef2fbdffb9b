//! Chart summary module
//!
//! Condenses a finished chart into a few numbers a caller can use to decide
//! whether the chart is worth keeping or needs re-running with a different
//! configuration.
//!
//! # Example
//!
//! ```no_run
//! use notechart::{generate_chart, compute_summary, ChartConfig, PitchFrame};
//!
//! let frames: Vec<PitchFrame> = (0..200)
//!     .map(|i| PitchFrame::new(i as f32 * 0.01, 261.63, 0.9))
//!     .collect();
//! let chart = generate_chart("demo", &frames, &ChartConfig::default())?;
//! let summary = compute_summary(&chart);
//!
//! println!("{} notes, {:.0}% voiced", summary.note_count, summary.voiced_ratio * 100.0);
//! # Ok::<(), notechart::ChartError>(())
//! ```

use super::result::Chart;
use serde::{Deserialize, Serialize};

/// Voiced ratio below which a chart is flagged as sparse
const SPARSE_VOICING_RATIO: f32 = 0.2;

/// Share of notes on the two outermost lanes above which lanes are flagged as clipping
const LANE_CLIPPING_RATIO: f32 = 0.25;

/// Chart quality flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartFlag {
    /// No notes survived
    EmptyChart,
    /// Few frames carried a usable pitch
    SparseVoicing,
    /// Many notes sit on the outermost lanes (lane_range too small for the melody)
    LaneClipping,
}

/// Chart summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    /// Number of notes
    pub note_count: usize,

    /// Voiced frames / total frames (0.0-1.0)
    pub voiced_ratio: f32,

    /// Notes per second of track
    pub notes_per_second: f32,

    /// Mean note duration in seconds (0.0 without notes)
    pub mean_note_duration: f32,

    /// Notes per lane, index = lane
    pub lane_histogram: Vec<usize>,

    /// Quality flags
    pub flags: Vec<ChartFlag>,
}

/// Summarize a chart
pub fn compute_summary(chart: &Chart) -> ChartSummary {
    log::debug!("Computing summary for chart '{}'", chart.name);

    let note_count = chart.notes.len();

    let voiced_ratio = if chart.metadata.frame_count > 0 {
        chart.metadata.voiced_frame_count as f32 / chart.metadata.frame_count as f32
    } else {
        0.0
    };

    let notes_per_second = if chart.length > 0.0 {
        note_count as f32 / chart.length
    } else {
        0.0
    };

    let mean_note_duration = if note_count > 0 {
        chart.notes.iter().map(|n| n.duration).sum::<f32>() / note_count as f32
    } else {
        0.0
    };

    let mut lane_histogram = vec![0usize; chart.lanes as usize];
    for lane in chart.notes.iter().filter_map(|n| n.lane) {
        if let Some(slot) = lane_histogram.get_mut(lane as usize) {
            *slot += 1;
        }
    }

    let mut flags = Vec::new();
    if note_count == 0 {
        flags.push(ChartFlag::EmptyChart);
    }
    if voiced_ratio < SPARSE_VOICING_RATIO {
        flags.push(ChartFlag::SparseVoicing);
    }
    if note_count > 0 && lane_histogram.len() > 1 {
        let outer = lane_histogram[0] + lane_histogram[lane_histogram.len() - 1];
        if outer as f32 / note_count as f32 > LANE_CLIPPING_RATIO {
            flags.push(ChartFlag::LaneClipping);
        }
    }

    log::debug!(
        "Summary: {} notes, voiced={:.2}, {:.2} notes/s, flags={:?}",
        note_count,
        voiced_ratio,
        notes_per_second,
        flags
    );

    ChartSummary {
        note_count,
        voiced_ratio,
        notes_per_second,
        mean_note_duration,
        lane_histogram,
        flags,
    }
}

impl ChartSummary {
    /// True when no flag was raised
    pub fn is_clean(&self) -> bool {
        self.flags.is_empty()
    }
}
