//! Error types for chart generation

use std::fmt;

/// Errors that can occur while generating a chart
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Invalid pitch trace (empty, non-monotonic timestamps, out-of-range values)
    InvalidInput(String),

    /// Configuration option outside its valid range
    InvalidConfig(String),

    /// Numerical error (a stage produced a non-finite value)
    NumericalError(String),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ChartError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ChartError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}
