//! Pitch stability
//!
//! - Hold engine: absorbs small deviations and suppresses short pitch changes
//! - Gap filler: bridges short unvoiced gaps inside a held pitch

pub mod gap_fill;
pub mod hold;

pub use gap_fill::fill_micro_gaps;
pub use hold::{apply_hold, HoldEngine, HoldState};
