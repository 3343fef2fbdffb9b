//! Voicing decision and Hz to MIDI conversion

use crate::config::ChartConfig;
use crate::trace::{MidiFrame, PitchFrame};

/// Convert a frequency to continuous MIDI pitch (69.0 = 440 Hz)
///
/// Returns `None` for non-positive or non-finite frequencies.
///
/// # Example
///
/// ```
/// use notechart::preprocessing::pitch::hz_to_midi;
///
/// assert_eq!(hz_to_midi(440.0), Some(69.0));
/// assert_eq!(hz_to_midi(0.0), None);
/// ```
pub fn hz_to_midi(freq: f32) -> Option<f32> {
    if freq > 0.0 && freq.is_finite() {
        Some(69.0 + 12.0 * (freq / 440.0).log2())
    } else {
        None
    }
}

/// True when a frame carries a usable pitch estimate
///
/// A frame is voiced when its frequency lies inside `[min_freq, max_freq]`
/// and its confidence reaches `min_confidence`.
pub fn is_voiced(frame: &PitchFrame, config: &ChartConfig) -> bool {
    frame.frequency_hz > 0.0
        && frame.frequency_hz >= config.min_freq
        && frame.frequency_hz <= config.max_freq
        && frame.confidence >= config.min_confidence
}

/// Map every frame to MIDI, unvoiced frames to `None`
pub fn to_midi_frames(frames: &[PitchFrame], config: &ChartConfig) -> Vec<MidiFrame> {
    frames
        .iter()
        .map(|frame| MidiFrame {
            time: frame.time,
            midi: if is_voiced(frame, config) {
                hz_to_midi(frame.frequency_hz)
            } else {
                None
            },
        })
        .collect()
}
