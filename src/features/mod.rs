//! Trace stabilization and note extraction
//!
//! - Stability: pitch hold, stability hysteresis, micro-gap filling
//! - Notes: segmentation, merging, phrase stretch, lane mapping

pub mod notes;
pub mod stability;
