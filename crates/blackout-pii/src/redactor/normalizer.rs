//! Span normalizer

use blackout_core::{CandidateSpan, Category, Detection, TextSnapshot};
use std::collections::HashSet;
use tracing::trace;

/// Convert raw detections into candidate spans against `snapshot`.
///
/// Spans outside `0 <= start < end <= len` are dropped. Name spans holding a formatted
/// identity string are split into their name fragments. Spans with an identical range are
/// kept once, the first one seen wins.
pub fn normalize(snapshot: &TextSnapshot, detections: Vec<Detection>) -> Vec<CandidateSpan> {
    let len = snapshot.len();
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(detections.len());

    for detection in detections {
        if detection.start >= detection.end || detection.end > len {
            trace!(
                category = %detection.category,
                start = detection.start,
                end = detection.end,
                "Dropping out of range detection"
            );
            continue;
        }

        let ranges = if detection.category == Category::Name {
            decompose_identity(snapshot, detection.start, detection.end)
        } else {
            vec![(detection.start, detection.end)]
        };

        for (start, end) in ranges {
            if seen.insert((start, end)) {
                candidates.push(CandidateSpan::new(detection.category, start, end));
            }
        }
    }

    candidates
}

/// Split a name span into the parts that identify a person.
///
/// `"Fuller, Don" <DFuller@caiso.com>` yields the display-name words and the alphabetic
/// local-part tokens; the domain is never included. `Fuller, Don` yields the two words and
/// leaves the comma visible. Anything else is returned unchanged.
fn decompose_identity(snapshot: &TextSnapshot, start: usize, end: usize) -> Vec<(usize, usize)> {
    let chars: Vec<char> = snapshot.chars().skip(start).take(end - start).collect();

    if let Some(at) = chars.iter().position(|c| *c == '@') {
        let mut local_start = at;
        while local_start > 0 && is_local_part_char(chars[local_start - 1]) {
            local_start -= 1;
        }

        let mut parts = runs(&chars[..local_start], 0, |c| c.is_alphabetic());
        parts.extend(
            runs(&chars[local_start..at], local_start, |c| !matches!(c, '.' | '_' | '-'))
                .into_iter()
                .filter(|(s, _)| chars[*s].is_alphabetic()),
        );
        return parts
            .into_iter()
            .map(|(s, e)| (start + s, start + e))
            .collect();
    }

    if chars.contains(&',') {
        return runs(&chars, 0, |c| !c.is_whitespace() && c != ',')
            .into_iter()
            .map(|(s, e)| (start + s, start + e))
            .collect();
    }

    vec![(start, end)]
}

fn is_local_part_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-')
}

/// Maximal runs of characters accepted by `keep`, as ranges shifted by `offset`
fn runs(chars: &[char], offset: usize, keep: impl Fn(char) -> bool) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut run_start = None;

    for (i, c) in chars.iter().enumerate() {
        match (keep(*c), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(s)) => {
                ranges.push((offset + s, offset + i));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = run_start {
        ranges.push((offset + s, offset + chars.len()));
    }

    ranges
}
