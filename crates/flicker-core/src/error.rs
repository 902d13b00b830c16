//! Error types for flicker timing analysis
//!
//! Provides a unified error type for the analysis crates. Sparse data is not
//! an error anywhere in this workspace: it is encoded as `None` in the result
//! model. The variants here cover bad configuration and contract violations.

use thiserror::Error;

/// Core error type for flicker timing analysis
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A statistic was requested over an empty sample
    #[error("Cannot compute a statistic over empty data")]
    EmptyData,

    /// Percentile outside of [0, 100]
    #[error("Percentile {p} must be in [0, 100]")]
    InvalidPercentile { p: f64 },

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that a percentile lies in [0, 100]
    pub fn check_percentile(p: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&p) {
            return Err(Error::InvalidPercentile { p });
        }
        Ok(())
    }

    /// Check that a sample is non-empty
    pub fn check_non_empty(data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyData);
        }
        Ok(())
    }

    /// Create an error for a parameter that must be finite and strictly positive
    pub fn non_positive(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} must be finite and > 0, got {value}"))
    }

    /// Create an error for a parameter that must be finite and non-negative
    pub fn negative(name: &str, value: f64) -> Self {
        Self::InvalidParameter(format!("{name} must be finite and >= 0, got {value}"))
    }
}
