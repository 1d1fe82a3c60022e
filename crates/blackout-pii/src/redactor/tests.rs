//! Tests for the resolver and masking engine

use super::*;
use blackout_core::{CandidateSpan, Category, Error, TextSnapshot};

fn span(category: Category, start: usize, end: usize) -> CandidateSpan {
    CandidateSpan::new(category, start, end)
}

fn blocks(n: usize) -> String {
    MASK_CHAR.to_string().repeat(n)
}

#[test]
fn test_resolve_empty() {
    let plan = resolve(Vec::new());
    assert!(plan.is_empty());
    assert_eq!(plan.len(), 0);
}

#[test]
fn test_resolve_partial_overlap_keeps_earlier() {
    let plan = resolve(vec![
        span(Category::Date, 15, 25),
        span(Category::Date, 10, 20),
    ]);
    assert_eq!(plan.as_slice(), &[span(Category::Date, 10, 20)]);
}

#[test]
fn test_resolve_same_start_prefers_longer() {
    let plan = resolve(vec![
        span(Category::Date, 26, 31),
        span(Category::Date, 26, 36),
    ]);
    assert_eq!(plan.as_slice(), &[span(Category::Date, 26, 36)]);
}

#[test]
fn test_resolve_nested_span_discarded() {
    let plan = resolve(vec![
        span(Category::Address, 0, 30),
        span(Category::Address, 5, 10),
        span(Category::Address, 30, 35),
    ]);
    assert_eq!(
        plan.as_slice(),
        &[span(Category::Address, 0, 30), span(Category::Address, 30, 35)]
    );
}

#[test]
fn test_resolve_tie_breaks_on_category_priority() {
    let plan = resolve(vec![
        span(Category::Concept, 4, 9),
        span(Category::Phone, 4, 9),
        span(Category::Name, 4, 9),
    ]);
    assert_eq!(plan.as_slice(), &[span(Category::Name, 4, 9)]);
}

#[test]
fn test_resolve_output_sorted_and_disjoint() {
    let plan = resolve(vec![
        span(Category::Phone, 40, 52),
        span(Category::Phone, 3, 8),
        span(Category::Phone, 20, 30),
        span(Category::Phone, 7, 12),
        span(Category::Phone, 29, 41),
    ]);
    let spans = plan.as_slice();
    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
    assert_eq!(
        spans,
        &[
            span(Category::Phone, 3, 8),
            span(Category::Phone, 20, 30),
            span(Category::Phone, 40, 52),
        ]
    );
}

#[test]
fn test_apply_masks_exact_ranges() {
    let snapshot = TextSnapshot::new("call 123-456-7890 now");
    let plan = RedactionPlan::from(vec![span(Category::Phone, 5, 17)]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.snapshot.as_str(), format!("call {} now", blocks(12)));
    assert_eq!(pass.records.len(), 1);
    assert_eq!(pass.records[0].start, 5);
    assert_eq!(pass.records[0].end, 17);
    assert_eq!(pass.records[0].category, Category::Phone);
}

#[test]
fn test_apply_records_in_descending_order() {
    let snapshot = TextSnapshot::new("aa bb cc");
    let plan = resolve(vec![span(Category::Name, 0, 2), span(Category::Name, 6, 8)]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    let starts: Vec<usize> = pass.records.iter().map(|r| r.start).collect();
    assert_eq!(starts, vec![6, 0]);
    assert_eq!(pass.snapshot.as_str(), format!("{} bb {}", blocks(2), blocks(2)));
}

#[test]
fn test_apply_truncates_at_line_break() {
    let snapshot = TextSnapshot::new("Dear John\nSmith wrote");
    let plan = RedactionPlan::from(vec![span(Category::Name, 5, 15)]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.snapshot.as_str(), format!("Dear {}\nSmith wrote", blocks(4)));
    assert_eq!(pass.records[0].end, 9);
    assert_eq!(pass.records[0].len(), 4);
}

#[test]
fn test_apply_truncates_at_unicode_line_separators() {
    for separator in ['\r', '\u{2028}', '\u{2029}', '\u{85}'] {
        let text = format!("abc{separator}def");
        let snapshot = TextSnapshot::new(text.as_str());
        let plan = RedactionPlan::from(vec![span(Category::Concept, 0, 7)]);

        let pass = apply_plan(&snapshot, &plan).unwrap();
        assert_eq!(pass.snapshot.as_str(), format!("{}{separator}def", blocks(3)));
        assert_eq!(pass.records[0].end, 3);
    }
}

#[test]
fn test_apply_line_break_first_yields_empty_record() {
    let snapshot = TextSnapshot::new("ab\ncd");
    let plan = RedactionPlan::from(vec![span(Category::Concept, 2, 5)]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.snapshot.as_str(), "ab\ncd");
    assert_eq!(pass.records.len(), 1);
    assert!(pass.records[0].is_empty());
}

#[test]
fn test_apply_zero_length_and_block_spans() {
    let snapshot = TextSnapshot::new(format!("{} tail", blocks(4)));
    let plan = RedactionPlan::from(vec![
        span(Category::Name, 0, 4),
        span(Category::Name, 5, 5),
    ]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.snapshot.as_str(), snapshot.as_str());
    assert_eq!(pass.records.len(), 2);
}

#[test]
fn test_apply_preserves_length_with_multibyte_text() {
    let text = "Zoë Müller wohnt in Köln, ☎ 030-123-4567.";
    let snapshot = TextSnapshot::new(text);
    let plan = RedactionPlan::from(vec![
        span(Category::Name, 0, 10),
        span(Category::Address, 20, 24),
        span(Category::Phone, 28, 40),
    ]);

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.snapshot.len(), snapshot.len());
    assert_eq!(
        pass.snapshot.as_str(),
        format!("{} wohnt in {}, ☎ {}.", blocks(10), blocks(4), blocks(12))
    );
}

#[test]
fn test_apply_rejects_overlap_without_partial_commit() {
    let snapshot = TextSnapshot::new("0123456789012345678901234567890");
    let plan = RedactionPlan::from(vec![
        span(Category::Date, 10, 20),
        span(Category::Date, 15, 25),
    ]);

    let err = apply_plan(&snapshot, &plan).unwrap_err();
    match err {
        Error::InvariantViolation { start, end, .. } => {
            assert_eq!((start, end), (15, 25));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(snapshot.as_str().chars().all(|c| c != MASK_CHAR));
}

#[test]
fn test_apply_rejects_out_of_range() {
    let snapshot = TextSnapshot::new("short");
    let plan = RedactionPlan::from(vec![span(Category::Phone, 2, 9)]);

    let err = apply_plan(&snapshot, &plan).unwrap_err();
    assert!(err.is_internal());
}

#[test]
fn test_apply_rejects_unsorted_plan() {
    let snapshot = TextSnapshot::new("aa bb cc");
    let plan = RedactionPlan::from(vec![span(Category::Name, 6, 8), span(Category::Name, 0, 2)]);

    assert!(apply_plan(&snapshot, &plan).is_err());
}

#[test]
fn test_overlapping_candidates_yield_single_record() {
    let snapshot = TextSnapshot::new("x".repeat(30));
    let plan = resolve(normalize(
        &snapshot,
        vec![
            blackout_core::Detection::new(Category::Date, 10, 20),
            blackout_core::Detection::new(Category::Date, 15, 25),
        ],
    ));

    let pass = apply_plan(&snapshot, &plan).unwrap();
    assert_eq!(pass.records.len(), 1);
    assert_eq!((pass.records[0].start, pass.records[0].end), (10, 20));
    assert_eq!(pass.snapshot.len(), 30);
}

#[test]
fn test_line_break_predicate() {
    assert!(is_line_break('\n'));
    assert!(is_line_break('\u{0C}'));
    assert!(!is_line_break(' '));
    assert!(!is_line_break('\t'));
}
