//! Error types for the pitch extraction engine

use std::fmt;

/// Errors that can occur during pitch contour extraction
#[derive(Debug, Clone)]
pub enum ExtractionError {
    /// Invalid configuration parameter (raised at construction, before any computation)
    InvalidConfig(String),

    /// Invalid input data (mismatched lengths, out-of-domain values)
    InvalidInput(String),

    /// Processing error during extraction
    ProcessingError(String),

    /// Numerical error (overflow, underflow, etc.)
    NumericalError(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ExtractionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExtractionError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            ExtractionError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractionError {}
