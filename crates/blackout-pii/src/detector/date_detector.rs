//! Regex-based date detector

use crate::detector::{SpanSource, detection_from_match};
use blackout_core::{Category, Detection, Result, TextSnapshot};
use regex::Regex;

const MONTHS: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";
const WEEKDAYS: &str = r"(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)[a-z]*";

/// Date detector covering numeric, ISO, month-name and email header formats.
///
/// Formats overlap on purpose: "01/01/2023" is also reported as the short form "01/01".
/// The conflict resolver keeps the longer phrase.
pub struct DateDetector {
    rules: Vec<(&'static str, Regex)>,
}

impl DateDetector {
    pub fn new() -> Result<Self> {
        let rules = vec![
            // 4/9/2025, 22-2-22
            (
                "numeric",
                Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2})\b")?,
            ),
            // 2024-01-15
            ("iso", Regex::new(r"\b\d{4}-\d{1,2}-\d{1,2}\b")?),
            // Thu, 8 Jun 2000
            (
                "rfc2822",
                Regex::new(&format!(
                    r"\b{WEEKDAYS},?[ \t]+\d{{1,2}}[ \t]+{MONTHS}\b\.?[ \t]+\d{{4}}\b"
                ))?,
            ),
            // January 15th, 2024 / Mar 3 / Sept. 9
            (
                "month_day",
                Regex::new(&format!(
                    r"\b{MONTHS}\b\.?[ \t]+\d{{1,2}}(?:st|nd|rd|th)?\b(?:,?[ \t]+\d{{4}}\b)?"
                ))?,
            ),
            // 15 October 2000
            (
                "day_month",
                Regex::new(&format!(
                    r"\b\d{{1,2}}(?:st|nd|rd|th)?[ \t]+{MONTHS}\b(?:,?[ \t]+\d{{4}}\b)?"
                ))?,
            ),
            // June 2000
            (
                "month_year",
                Regex::new(&format!(r"\b{MONTHS}\b\.?[ \t]+\d{{4}}\b"))?,
            ),
            // 09/24
            ("short", Regex::new(r"\b\d{1,2}/\d{1,2}\b")?),
        ];

        Ok(Self { rules })
    }
}

impl SpanSource for DateDetector {
    fn name(&self) -> &str {
        "dates"
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Date]
    }

    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        let text = snapshot.as_str();
        let mut detections = Vec::new();

        for (rule, regex) in &self.rules {
            for m in regex.find_iter(text) {
                if let Some(detection) = detection_from_match(snapshot, Category::Date, &m, rule) {
                    detections.push(detection);
                }
            }
        }

        detections.sort_by_key(|d| (d.start, d.end));

        Ok(detections)
    }
}
