//! Blackout PII Detection and Redaction
//!
//! This crate provides the span detection, conflict resolution and masking engine:
//! - Name, date, phone, address and concept span sources
//! - Span normalization and overlap resolution
//! - Length-preserving block-character masking
//! - Per-file category passes with statistics

pub mod detector;
pub mod pipeline;
pub mod redactor;

pub use detector::{
    AddressDetector, AnnotationSource, ConceptConfig, ConceptDetector, DateDetector,
    DetectorConfig, NameConfig, NameDetector, PhoneConfig, PhoneDetector, SentenceScorer,
    SpanSource,
};
pub use pipeline::{CategoryFlags, FileOutcome, RedactionPipeline};
pub use redactor::{
    MASK_CHAR, MaskedPass, RedactionPlan, apply_plan, is_line_break, normalize, resolve,
};
