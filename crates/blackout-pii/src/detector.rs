//! Span sources

mod address_detector;
mod annotation;
mod concept_detector;
mod date_detector;
mod name_detector;
mod phone_detector;

pub use address_detector::AddressDetector;
pub use annotation::{AnnotationSource, EntityAnnotation, category_for_label};
pub use concept_detector::{ConceptDetector, SentenceScorer, split_sentences};
pub use date_detector::DateDetector;
pub use name_detector::NameDetector;
pub use phone_detector::PhoneDetector;

use blackout_core::{Category, Detection, DetectionPayload, Result, TextSnapshot};
use regex::Match;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything that produces candidate spans over a text snapshot.
///
/// Sources are built once from explicit configuration and then behave as pure functions of
/// the snapshot: they never mutate it and report code-point offsets into exactly the
/// snapshot they were given. Returning an error degrades the current pass to zero
/// candidates from this source.
pub trait SpanSource: Send + Sync {
    /// Name used in logs and warnings
    fn name(&self) -> &str;

    /// Categories this source can report
    fn supported_categories(&self) -> Vec<Category>;

    /// Detect spans in the given snapshot
    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>>;
}

/// Configuration for the built-in span sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default)]
    pub names: NameConfig,

    #[serde(default)]
    pub phones: PhoneConfig,

    #[serde(default)]
    pub concepts: ConceptConfig,
}

/// Name detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameConfig {
    /// Email header prefixes whose values are scanned for names
    #[serde(default = "default_email_headers")]
    pub email_headers: Vec<String>,

    /// Capitalised words that are never part of a name
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Look for capitalised name runs in free text
    #[serde(default = "default_true")]
    pub detect_body_names: bool,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            email_headers: default_email_headers(),
            stopwords: default_stopwords(),
            detect_body_names: true,
        }
    }
}

/// Phone detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneConfig {
    /// Minimum number of digits for a match to count as a phone number
    #[serde(default = "default_min_digits")]
    pub min_digits: usize,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            min_digits: default_min_digits(),
        }
    }
}

/// Concept detection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptConfig {
    /// Concept terms to redact
    #[serde(default)]
    pub terms: Vec<String>,

    /// Additional related terms per concept
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

fn default_email_headers() -> Vec<String> {
    [
        "From:",
        "To:",
        "Cc:",
        "Bcc:",
        "Subject:",
        "X-From:",
        "X-To:",
        "X-cc:",
        "X-bcc:",
        "X-Folder:",
        "X-Origin:",
        "X-FileName:",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

fn default_stopwords() -> Vec<String> {
    [
        // Titles
        "Mr", "Mrs", "Ms", "Miss", "Mx", "Dr", "Prof", "Sir", "Madam", "Rev", "Hon",
        // Sentence openers and function words
        "The", "A", "An", "This", "That", "These", "Those", "We", "I", "It", "In", "On", "At",
        "For", "From", "To", "Of", "And", "Or", "But", "If", "When", "While", "With", "Our",
        "Your", "Their", "His", "Her", "My", "Dear", "Hi", "Hello", "Thanks", "Regards", "Best",
        "Please", "Note", "Also", "However", "Re", "Fwd", "Subject",
        // Calendar words
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday",
        "Friday", "Saturday", "Sunday",
        // Street and place words
        "Street", "St", "Avenue", "Ave", "Road", "Rd", "Boulevard", "Blvd", "Lane", "Drive",
        "Court", "Way", "Place", "New", "North", "South", "East", "West", "San", "Los", "Las",
        "Saint",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn default_min_digits() -> usize {
    7
}

fn default_true() -> bool {
    true
}

/// Convert a regex match into a detection, skipping matches that do not fall on
/// character boundaries of the snapshot.
pub(crate) fn detection_from_match(
    snapshot: &TextSnapshot,
    category: Category,
    m: &Match<'_>,
    rule: &str,
) -> Option<Detection> {
    let (start, end) = snapshot.char_range(m.start(), m.end())?;
    Some(
        Detection::new(category, start, end).with_payload(DetectionPayload::Pattern {
            rule: rule.to_string(),
        }),
    )
}
