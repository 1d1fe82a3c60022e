//! Masking engine

use super::{MASK_CHAR, RedactionPlan};
use blackout_core::{CandidateSpan, Error, RedactionRecord, Result, TextSnapshot};
use std::iter;

/// Result of committing one redaction plan
#[derive(Debug, Clone)]
pub struct MaskedPass {
    /// Text after masking, same length as the input snapshot
    pub snapshot: TextSnapshot,

    /// One record per plan entry, in application order (descending start)
    pub records: Vec<RedactionRecord>,
}

/// Code points that end a line
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Apply a redaction plan to a snapshot.
///
/// The whole plan is validated before anything is masked, so a violation leaves the
/// snapshot untouched. Spans are applied from the end of the text backwards and each one
/// stops at its first line break.
pub fn apply_plan(snapshot: &TextSnapshot, plan: &RedactionPlan) -> Result<MaskedPass> {
    validate(snapshot, plan)?;

    let mut chars: Vec<char> = snapshot.chars().collect();
    let mut records = Vec::with_capacity(plan.len());

    for span in plan.iter().rev() {
        let end = chars[span.start..span.end]
            .iter()
            .position(|c| is_line_break(*c))
            .map_or(span.end, |offset| span.start + offset);

        chars.splice(span.start..end, iter::repeat_n(MASK_CHAR, end - span.start));
        records.push(RedactionRecord {
            category: span.category,
            start: span.start,
            end,
        });
    }

    Ok(MaskedPass {
        snapshot: TextSnapshot::new(chars.into_iter().collect::<String>()),
        records,
    })
}

fn validate(snapshot: &TextSnapshot, plan: &RedactionPlan) -> Result<()> {
    let len = snapshot.len();
    let mut previous_end = 0;

    for span in plan {
        if span.start > span.end {
            return Err(violation(span, "start is after end".to_string()));
        }
        if span.end > len {
            return Err(violation(span, format!("ends past text length {len}")));
        }
        if span.start < previous_end {
            return Err(violation(
                span,
                format!("overlaps or precedes previous span ending at {previous_end}"),
            ));
        }
        previous_end = span.end;
    }

    Ok(())
}

fn violation(span: &CandidateSpan, reason: String) -> Error {
    Error::InvariantViolation {
        category: span.category,
        start: span.start,
        end: span.end,
        reason,
    }
}
