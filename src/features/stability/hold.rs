//! Pitch hold with stability hysteresis
//!
//! A small state machine over the MIDI trace:
//!
//! ```text
//! Unanchored --voiced--> Held(p)
//! Held(p) --|m - p| <= tol--> Held(p)                       (absorbed, outputs p)
//! Held(p) --|m - p| >  tol--> PendingChange(m, 1)           (outputs p provisionally)
//! PendingChange(c, n) --back near p--> Held(p)              (pending frames keep p)
//! PendingChange(c, n) --near c, n+1 == stability--> Held(c) (pending frames rewritten to c)
//! PendingChange(c, n) --elsewhere--> PendingChange(m, 1)
//! ```
//!
//! The held pitch is the first value of its run and never drifts. Unvoiced
//! frames pass through, abort any pending change, and leave the held pitch in
//! place so the gap filler can bridge across them.

use crate::trace::MidiFrame;

/// Hold engine state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldState {
    /// No voiced frame seen yet
    Unanchored,
    /// Pitch currently emitted
    Held(f32),
    /// A different pitch is trying to take over
    PendingChange {
        /// Pitch still emitted while the change is unconfirmed
        held: f32,
        /// First value of the pending run
        candidate: f32,
        /// Index of the first pending frame
        start: usize,
        /// Consecutive frames near `candidate`
        count: usize,
    },
}

/// Incremental hold engine; feed frames in order, then [`HoldEngine::finish`]
#[derive(Debug, Clone)]
pub struct HoldEngine {
    state: HoldState,
    tolerance: f32,
    stability_frames: usize,
    out: Vec<Option<f32>>,
}

impl HoldEngine {
    /// Create an engine
    ///
    /// * `tolerance` - Pitch distance absorbed into the held pitch, in semitones
    /// * `stability_frames` - Frames a new pitch must persist before it is held
    pub fn new(tolerance: f32, stability_frames: usize) -> Self {
        Self {
            state: HoldState::Unanchored,
            tolerance,
            stability_frames: stability_frames.max(1),
            out: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Feed the next frame's pitch
    pub fn push(&mut self, midi: Option<f32>) {
        let i = self.out.len();

        let Some(m) = midi else {
            if let HoldState::PendingChange { held, .. } = self.state {
                self.state = HoldState::Held(held);
            }
            self.out.push(None);
            return;
        };

        self.state = match self.state {
            HoldState::Unanchored => {
                self.out.push(Some(m));
                HoldState::Held(m)
            }
            HoldState::Held(held) => {
                if self.near(m, held) {
                    self.out.push(Some(held));
                    HoldState::Held(held)
                } else if self.stability_frames == 1 {
                    self.out.push(Some(m));
                    HoldState::Held(m)
                } else {
                    self.out.push(Some(held));
                    HoldState::PendingChange {
                        held,
                        candidate: m,
                        start: i,
                        count: 1,
                    }
                }
            }
            HoldState::PendingChange {
                held,
                candidate,
                start,
                count,
            } => {
                if self.near(m, held) {
                    // Reverted: pending frames were already written as `held`
                    self.out.push(Some(held));
                    HoldState::Held(held)
                } else if self.near(m, candidate) {
                    self.out.push(Some(held));
                    let count = count + 1;
                    if count >= self.stability_frames {
                        for slot in self.out[start..=i].iter_mut().filter(|s| s.is_some()) {
                            *slot = Some(candidate);
                        }
                        HoldState::Held(candidate)
                    } else {
                        HoldState::PendingChange {
                            held,
                            candidate,
                            start,
                            count,
                        }
                    }
                } else {
                    self.out.push(Some(held));
                    HoldState::PendingChange {
                        held,
                        candidate: m,
                        start: i,
                        count: 1,
                    }
                }
            }
        };
    }

    /// Emitted pitches, one per fed frame
    ///
    /// A change still pending at the end never confirmed, so its frames keep
    /// the held pitch.
    pub fn finish(self) -> Vec<Option<f32>> {
        self.out
    }

    fn near(&self, a: f32, b: f32) -> bool {
        (a - b).abs() <= self.tolerance
    }
}

/// Apply pitch hold and stability hysteresis to a trace
///
/// # Arguments
///
/// * `frames` - Conditioned MIDI frames
/// * `stability_frames` - Frames a new pitch must persist before switching
/// * `hold_tolerance` - Pitch distance absorbed into the held pitch
///
/// # Returns
///
/// Frames of the same length and timing
pub fn apply_hold(
    frames: &[MidiFrame],
    stability_frames: usize,
    hold_tolerance: f32,
) -> Vec<MidiFrame> {
    log::debug!(
        "Applying pitch hold to {} frames (stability_frames={}, tolerance={:.2})",
        frames.len(),
        stability_frames,
        hold_tolerance
    );

    let mut engine = HoldEngine::new(hold_tolerance, stability_frames);
    for frame in frames {
        engine.push(frame.midi);
    }

    frames
        .iter()
        .zip(engine.finish())
        .map(|(frame, midi)| MidiFrame {
            time: frame.time,
            midi,
        })
        .collect()
}
