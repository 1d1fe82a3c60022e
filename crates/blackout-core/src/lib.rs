//! Blackout Core Types
//!
//! This crate provides the fundamental types shared by the redaction engine and the CLI:
//! - Redaction categories and text snapshots
//! - Detection, candidate span and redaction record types
//! - Redaction statistics and their accumulation
//! - Core error types

pub mod category;
pub mod error;
pub mod snapshot;
pub mod span;
pub mod stats;

pub use category::Category;
pub use error::{Error, Result};
pub use snapshot::TextSnapshot;
pub use span::{CandidateSpan, Detection, DetectionPayload, RedactionRecord};
pub use stats::{FileStats, RedactionCounts, Statistics};
