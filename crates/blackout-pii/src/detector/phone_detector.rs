//! Regex-based phone number detector

use crate::detector::{PhoneConfig, SpanSource, detection_from_match};
use blackout_core::{Category, Detection, Result, TextSnapshot};
use regex::Regex;

/// Phone number detector
pub struct PhoneDetector {
    phone_regex: Regex,
    international_regex: Regex,
    min_digits: usize,
}

impl PhoneDetector {
    /// Create a new phone detector with the given configuration
    pub fn new(config: &PhoneConfig) -> Result<Self> {
        // +1 (123) 456-7890, 123-456-7890, +44 20 7946 0958
        let phone_regex = Regex::new(
            r"(?x)
            (?:\+\d{1,3}[\ \t-]?)?                  # optional international prefix
            (?:\(?\d{3}\)?[\ \t-]?)?                # optional area code
            (?:\d{3}[\ \t-]?\d{4}|\d{2,4}[\ \t-]?\d{2,4}[\ \t-]?\d{2,4})  # main number
            ",
        )?;

        let international_regex = Regex::new(r"^\+\d{1,4}\s\d+")?;

        Ok(Self {
            phone_regex,
            international_regex,
            min_digits: config.min_digits,
        })
    }

    /// Validate a potential phone number.
    ///
    /// Accepts a leading "+<country code> <digits>" or any grouped number (space, tab or
    /// dash separated); either way it needs at least `min_digits` digits.
    fn validate_phone(&self, phone: &str) -> bool {
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < self.min_digits {
            return false;
        }

        self.international_regex.is_match(phone) || phone.contains(['-', ' ', '\t'])
    }
}

impl SpanSource for PhoneDetector {
    fn name(&self) -> &str {
        "phones"
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Phone]
    }

    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        let text = snapshot.as_str();
        let mut detections = Vec::new();

        for m in self.phone_regex.find_iter(text) {
            if !self.validate_phone(m.as_str()) {
                continue;
            }
            if let Some(detection) = detection_from_match(snapshot, Category::Phone, &m, "phone") {
                detections.push(detection);
            }
        }

        Ok(detections)
    }
}
