//! Regex-based postal address detector

use crate::detector::SpanSource;
use blackout_core::{Category, Detection, DetectionPayload, Result, TextSnapshot};
use regex::Regex;

const STREET_SUFFIXES: &str = r"(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl|Terrace|Parkway|Pkwy|Highway|Hwy)";

/// Postal address detector.
///
/// Addresses are found as components (street line, "City, ST 12345" locality, PO box, ZIP+4) and
/// adjacent components are consolidated into a single address span.
pub struct AddressDetector {
    components: Vec<(&'static str, Regex)>,
}

impl AddressDetector {
    pub fn new() -> Result<Self> {
        let components = vec![
            // 123 Main St.
            (
                "street",
                Regex::new(&format!(
                    r"\b\d{{1,5}}(?:[ \t]+[A-Z][A-Za-z]*\.?){{1,4}}?[ \t]+{STREET_SUFFIXES}\b\.?"
                ))?,
            ),
            // P.O. Box 42
            ("po_box", Regex::new(r"\bP\.?[ \t]?O\.?[ \t]+Box[ \t]+\d+\b")?),
            // Springfield, IL 62704
            (
                "locality",
                Regex::new(
                    r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*,[ \t]*[A-Z]{2}[ \t]+\d{5}(?:-\d{4})?\b",
                )?,
            ),
            // 62704-1234
            ("zip4", Regex::new(r"\b\d{5}-\d{4}\b")?),
        ];

        Ok(Self { components })
    }
}

/// Merge address components into whole addresses.
///
/// Components are taken in position order. A component joins the current address when only
/// commas and blanks separate them, unless it starts with a digit: a numeric token always
/// begins a new address. Ranges are code-point offsets into `snapshot`.
pub fn consolidate_components(
    snapshot: &TextSnapshot,
    mut components: Vec<(usize, usize)>,
) -> Vec<(usize, usize)> {
    components.sort_unstable();
    let mut addresses: Vec<(usize, usize)> = Vec::new();

    for (start, end) in components {
        let starts_numeric = snapshot
            .slice(start, end)
            .and_then(|s| s.chars().next())
            .is_some_and(|c| c.is_ascii_digit());

        if let Some(current) = addresses.last_mut() {
            if start < current.1 {
                // Overlapping component, keep the wider reach
                current.1 = current.1.max(end);
                continue;
            }
            let joined = !starts_numeric
                && snapshot
                    .slice(current.1, start)
                    .is_some_and(|gap| gap.chars().all(|c| matches!(c, ',' | ' ' | '\t')));
            if joined {
                current.1 = end;
                continue;
            }
        }
        addresses.push((start, end));
    }

    addresses
}

impl SpanSource for AddressDetector {
    fn name(&self) -> &str {
        "addresses"
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Address]
    }

    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        let text = snapshot.as_str();
        let mut components = Vec::new();

        for (_, regex) in &self.components {
            for m in regex.find_iter(text) {
                if let Some(range) = snapshot.char_range(m.start(), m.end()) {
                    components.push(range);
                }
            }
        }

        let detections = consolidate_components(snapshot, components)
            .into_iter()
            .map(|(start, end)| {
                Detection::new(Category::Address, start, end).with_payload(
                    DetectionPayload::Pattern {
                        rule: "address".to_string(),
                    },
                )
            })
            .collect();

        Ok(detections)
    }
}
