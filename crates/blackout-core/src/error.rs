//! Error types for Blackout Core

use crate::category::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A span source failed; the pass degrades to zero candidates for that source
    #[error("Detector '{detector}' failed: {message}")]
    Detector { detector: String, message: String },

    /// A redaction plan reached the masking engine in an invalid state
    #[error("Redaction plan invariant violated for {category} span [{start}, {end}): {reason}")]
    InvariantViolation {
        category: Category,
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a detector error for the named source.
    pub fn detector(detector: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Detector {
            detector: detector.into(),
            message: message.into(),
        }
    }

    /// Whether this error signals an internal defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::InvariantViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
