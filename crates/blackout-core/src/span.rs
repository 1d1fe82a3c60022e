//! Detection, candidate span and redaction record types

use crate::category::Category;
use serde::{Deserialize, Serialize};

/// Raw output of a span source.
///
/// Offsets are code-point indices into the snapshot the source was given. They are not
/// validated here; the span normalizer drops anything out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Category the source assigned to the span
    pub category: Category,

    /// Start position (code points, inclusive)
    pub start: usize,

    /// End position (code points, exclusive)
    pub end: usize,

    /// Source specific information about the match
    #[serde(default)]
    pub payload: DetectionPayload,
}

impl Detection {
    pub fn new(category: Category, start: usize, end: usize) -> Self {
        Self {
            category,
            start,
            end,
            payload: DetectionPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: DetectionPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// What a detector knows about a match beyond its offsets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionPayload {
    #[default]
    None,

    /// Matched by a named pattern rule
    Pattern { rule: String },

    /// Reported by an entity recogniser
    Entity { label: String, salience: f32 },

    /// Sentence scored against a concept
    Similarity { concept: String, score: f32 },
}

/// Canonical span consumed by the conflict resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateSpan {
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

impl CandidateSpan {
    pub fn new(category: Category, start: usize, end: usize) -> Self {
        Self {
            category,
            start,
            end,
        }
    }

    /// Length in code points
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A span that was actually masked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRecord {
    #[serde(rename = "type")]
    pub category: Category,
    pub start: usize,
    pub end: usize,
}

impl RedactionRecord {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
