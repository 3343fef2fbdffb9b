//! Voiced-only moving average

use crate::trace::MidiFrame;

/// Smooth MIDI values with a trailing moving average
///
/// Each voiced frame becomes the mean of the voiced values among itself and
/// the preceding `window_size - 1` frames. Unvoiced frames are left out of
/// every average and stay unvoiced; nothing is synthesized here.
///
/// # Arguments
///
/// * `frames` - MIDI frames
/// * `window_size` - Window length in frames (1 = no smoothing)
///
/// # Returns
///
/// Smoothed frames, same length and timing
pub fn smooth_voiced(frames: &[MidiFrame], window_size: usize) -> Vec<MidiFrame> {
    log::debug!(
        "Smoothing {} frames with window size {}",
        frames.len(),
        window_size
    );

    let window_size = window_size.max(1);

    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            if frame.midi.is_none() {
                return *frame;
            }

            let lo = (i + 1).saturating_sub(window_size);
            let (sum, count) = frames[lo..=i]
                .iter()
                .filter_map(|f| f.midi)
                .fold((0.0f32, 0usize), |(s, c), m| (s + m, c + 1));

            MidiFrame::voiced(frame.time, sum / count as f32)
        })
        .collect()
}
