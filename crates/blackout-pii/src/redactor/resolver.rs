//! Conflict resolver

use blackout_core::CandidateSpan;
use std::cmp::Reverse;
use tracing::debug;

/// Ordered, non-overlapping spans to mask in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionPlan {
    spans: Vec<CandidateSpan>,
}

impl RedactionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateSpan> {
        self.spans.iter()
    }

    pub fn as_slice(&self) -> &[CandidateSpan] {
        &self.spans
    }
}

/// Wrap spans as a plan without resolving them. The masking engine still validates the result.
impl From<Vec<CandidateSpan>> for RedactionPlan {
    fn from(spans: Vec<CandidateSpan>) -> Self {
        Self { spans }
    }
}

impl<'a> IntoIterator for &'a RedactionPlan {
    type Item = &'a CandidateSpan;
    type IntoIter = std::slice::Iter<'a, CandidateSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

/// Resolve overlapping candidates into a redaction plan.
///
/// Candidates are ordered by start, then longest first, then category priority. A sweep
/// accepts a span only when it starts at or after the end of the last accepted span; an
/// overlapping span is discarded whole, never trimmed or merged.
pub fn resolve(mut candidates: Vec<CandidateSpan>) -> RedactionPlan {
    candidates.sort_by_key(|span| (span.start, Reverse(span.len()), span.category.priority()));

    let total = candidates.len();
    let mut spans: Vec<CandidateSpan> = Vec::with_capacity(total);
    let mut last_end = 0;

    for span in candidates {
        if span.start >= last_end {
            last_end = span.end;
            spans.push(span);
        }
    }

    if spans.len() < total {
        debug!(
            accepted = spans.len(),
            discarded = total - spans.len(),
            "Resolved overlapping candidates"
        );
    }

    RedactionPlan { spans }
}
