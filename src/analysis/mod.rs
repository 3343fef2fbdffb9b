//! Chart results and summaries
//!
//! - Result types (chart, notes, pitch trace, metadata)
//! - Chart summary and quality flags

pub mod result;
pub mod summary;
