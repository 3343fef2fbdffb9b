//! Pitch trace types and input validation
//!
//! A trace is the time-ordered output of an external pitch detector: one
//! [`PitchFrame`] per hop. Conditioning turns it into [`MidiFrame`]s, and the
//! stability and gap-filling stages keep that sequence one-to-one with the
//! input frames.

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// Slack on time comparisons, absorbs f32 rounding in accumulated timestamps
pub(crate) const TIME_EPSILON: f32 = 1e-4;

/// Allowed relative deviation of a frame spacing from the mean hop before warning
const HOP_IRREGULARITY_WARN: f32 = 0.1;

/// One raw pitch estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchFrame {
    /// Time from track start in seconds
    pub time: f32,

    /// Estimated fundamental in Hz (0.0 = unvoiced)
    pub frequency_hz: f32,

    /// Detector confidence (0.0-1.0)
    pub confidence: f32,
}

impl PitchFrame {
    /// Create a frame
    pub fn new(time: f32, frequency_hz: f32, confidence: f32) -> Self {
        Self {
            time,
            frequency_hz,
            confidence,
        }
    }
}

/// One frame of MIDI pitch; `midi == None` is unvoiced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidiFrame {
    /// Time from track start in seconds
    pub time: f32,

    /// Continuous MIDI pitch (69.0 = A4)
    pub midi: Option<f32>,
}

impl MidiFrame {
    /// Voiced frame
    pub fn voiced(time: f32, midi: f32) -> Self {
        Self {
            time,
            midi: Some(midi),
        }
    }

    /// Unvoiced frame
    pub fn unvoiced(time: f32) -> Self {
        Self { time, midi: None }
    }

    /// True when the frame carries a pitch
    pub fn is_voiced(&self) -> bool {
        self.midi.is_some()
    }
}

/// Check the preconditions every stage relies on
///
/// # Errors
///
/// Returns `ChartError::InvalidInput` if the trace is empty, a timestamp is
/// not finite or not strictly increasing, a frequency is negative or not
/// finite, or a confidence lies outside [0, 1]
pub fn validate_frames(frames: &[PitchFrame]) -> Result<(), ChartError> {
    if frames.is_empty() {
        return Err(ChartError::InvalidInput("Empty pitch trace".to_string()));
    }

    let mut prev_time: Option<f32> = None;
    for (i, frame) in frames.iter().enumerate() {
        if !frame.time.is_finite() || frame.time < 0.0 {
            return Err(ChartError::InvalidInput(format!(
                "Frame {} has invalid time {}",
                i, frame.time
            )));
        }
        if let Some(prev) = prev_time {
            if frame.time <= prev {
                return Err(ChartError::InvalidInput(format!(
                    "Timestamps must be strictly increasing: frame {} at {}s follows {}s",
                    i, frame.time, prev
                )));
            }
        }
        if !frame.frequency_hz.is_finite() || frame.frequency_hz < 0.0 {
            return Err(ChartError::InvalidInput(format!(
                "Frame {} has invalid frequency {}",
                i, frame.frequency_hz
            )));
        }
        if !(0.0..=1.0).contains(&frame.confidence) {
            return Err(ChartError::InvalidInput(format!(
                "Frame {} has confidence {} outside [0.0, 1.0]",
                i, frame.confidence
            )));
        }
        prev_time = Some(frame.time);
    }

    Ok(())
}

/// Infer the hop interval in seconds from frame timestamps
///
/// Uses the mean spacing. A single frame has no spacing and yields 0.0.
/// Spacings that stray from the mean are legal but logged.
pub fn infer_hop_seconds(times: &[f32]) -> f32 {
    if times.len() < 2 {
        return 0.0;
    }

    let hop = (times[times.len() - 1] - times[0]) / (times.len() - 1) as f32;

    let irregular = times
        .windows(2)
        .filter(|w| ((w[1] - w[0]) - hop).abs() > hop * HOP_IRREGULARITY_WARN)
        .count();
    if irregular > 0 {
        log::warn!(
            "{} of {} frame spacings deviate from the mean hop of {:.4}s",
            irregular,
            times.len() - 1,
            hop
        );
    }

    hop
}

/// End time of the span covered by frame `i`: the next frame's time, or one
/// hop past the last frame
pub(crate) fn frame_end(frames: &[MidiFrame], i: usize, hop_seconds: f32) -> f32 {
    frames
        .get(i + 1)
        .map(|f| f.time)
        .unwrap_or(frames[i].time + hop_seconds)
}

/// Duration of the span `[start, end)` such that `start + duration <= end`
/// holds exactly in f32
///
/// Plain `end - start` can round up by one ulp, which makes touching notes
/// overlap once the end is recomputed as `start + duration`.
pub(crate) fn span_duration(start: f32, end: f32) -> f32 {
    let mut duration = end - start;
    while duration > 0.0 && start + duration > end {
        duration = f32::from_bits(duration.to_bits() - 1);
    }
    duration
}
