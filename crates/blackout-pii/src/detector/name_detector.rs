//! Rule-based personal name detector

use crate::detector::{NameConfig, SpanSource};
use blackout_core::{Category, Detection, DetectionPayload, Result, TextSnapshot};
use regex::Regex;
use std::collections::HashSet;

/// Finds personal names in email headers, email addresses and free text.
///
/// This is a stand-in for a statistical entity recogniser: it relies on capitalisation and
/// the structure of email headers, so it favours recall over precision.
pub struct NameDetector {
    header_regex: Option<Regex>,
    header_name_regex: Regex,
    email_regex: Regex,
    body_run_regex: Regex,
    stopwords: HashSet<String>,
    detect_body_names: bool,
}

impl NameDetector {
    /// Create a new name detector with the given configuration
    pub fn new(config: &NameConfig) -> Result<Self> {
        // Header lines, e.g. "X-From: Fuller, Don <DFuller@caiso.com>"
        let header_regex = if config.email_headers.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = config
                .email_headers
                .iter()
                .map(|h| regex::escape(h))
                .collect();
            Some(Regex::new(&format!(
                r"(?m)^(?:{})([^\r\n]*)",
                alternatives.join("|")
            ))?)
        };

        // Lastname, Firstname | Firstname [M.] Lastname | I. Lastname | Single
        let header_name_regex = Regex::new(
            r"\b(?:[A-Z][a-z]+,[ \t]*[A-Z][a-z]+|[A-Z][a-z]+(?:[ \t]+[A-Z]\.)?[ \t]+[A-Z][a-z]+|[A-Z]\.[ \t]+[A-Z][a-z]+|[A-Z][a-z]+)\b",
        )?;

        let email_regex = Regex::new(r"\b([A-Za-z0-9._%+-]+)@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?;

        // Two or more capitalised words on one line, initials allowed in between
        let body_run_regex = Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+(?:[A-Z]\.|[A-Z][a-z]+\b))+")?;

        let stopwords = config.stopwords.iter().map(|w| w.to_lowercase()).collect();

        Ok(Self {
            header_regex,
            header_name_regex,
            email_regex,
            body_run_regex,
            stopwords,
            detect_body_names: config.detect_body_names,
        })
    }

    fn detect_header_names(&self, snapshot: &TextSnapshot, detections: &mut Vec<Detection>) {
        let Some(header_regex) = &self.header_regex else {
            return;
        };
        let text = snapshot.as_str();

        for header in header_regex.captures_iter(text) {
            let Some(value) = header.get(1) else {
                continue;
            };
            let offset = value.start();
            for name in self.header_name_regex.find_iter(value.as_str()) {
                if self.is_stopword(name.as_str()) {
                    continue;
                }
                if let Some((start, end)) =
                    snapshot.char_range(offset + name.start(), offset + name.end())
                {
                    detections.push(Detection::new(Category::Name, start, end).with_payload(
                        DetectionPayload::Pattern {
                            rule: "email_header".to_string(),
                        },
                    ));
                }
            }
        }
    }

    /// Mask the identifying fragments of an address's local part, never its domain
    fn detect_email_names(&self, snapshot: &TextSnapshot, detections: &mut Vec<Detection>) {
        let text = snapshot.as_str();

        for email in self.email_regex.captures_iter(text) {
            let Some(local) = email.get(1) else {
                continue;
            };
            let mut token_start = local.start();
            let local_text = local.as_str();

            for (i, c) in local_text.char_indices().chain(std::iter::once((local_text.len(), '.'))) {
                if !matches!(c, '.' | '_' | '-') {
                    continue;
                }
                let token_end = local.start() + i;
                let token = &text[token_start..token_end];
                if token.chars().next().is_some_and(char::is_alphabetic) {
                    if let Some((start, end)) = snapshot.char_range(token_start, token_end) {
                        detections.push(Detection::new(Category::Name, start, end).with_payload(
                            DetectionPayload::Pattern {
                                rule: "email_local_part".to_string(),
                            },
                        ));
                    }
                }
                token_start = token_end + 1;
            }
        }
    }

    fn detect_body_names(&self, snapshot: &TextSnapshot, detections: &mut Vec<Detection>) {
        let text = snapshot.as_str();

        for run in self.body_run_regex.find_iter(text) {
            // Word tokens of the run with their byte offsets
            let mut words: Vec<(usize, &str)> = Vec::new();
            let mut cursor = run.start();
            for word in run.as_str().split([' ', '\t']) {
                if !word.is_empty() {
                    words.push((cursor, word));
                }
                cursor += word.len() + 1;
            }

            let is_edge = |word: &str| self.is_stopword(word) || is_initial(word);
            while words.first().is_some_and(|(_, w)| is_edge(*w)) {
                words.remove(0);
            }
            while words.last().is_some_and(|(_, w)| is_edge(*w)) {
                words.pop();
            }

            let full_words = words
                .iter()
                .filter(|(_, w)| !is_initial(w) && !self.is_stopword(w))
                .count();
            if full_words < 2 {
                continue;
            }

            let (first_offset, _) = words[0];
            let (last_offset, last_word) = words[words.len() - 1];
            let byte_end = last_offset + last_word.len();
            if let Some((start, end)) = snapshot.char_range(first_offset, byte_end) {
                detections.push(Detection::new(Category::Name, start, end).with_payload(
                    DetectionPayload::Pattern {
                        rule: "capitalised_run".to_string(),
                    },
                ));
            }
        }
    }

    fn is_stopword(&self, word: &str) -> bool {
        let word = word.trim_end_matches('.');
        self.stopwords.contains(&word.to_lowercase())
    }
}

/// Single-letter initial such as "A."
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_uppercase()
    )
}

impl SpanSource for NameDetector {
    fn name(&self) -> &str {
        "names"
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Name]
    }

    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();

        self.detect_header_names(snapshot, &mut detections);
        self.detect_email_names(snapshot, &mut detections);
        if self.detect_body_names {
            self.detect_body_names(snapshot, &mut detections);
        }

        // Sort detections by position
        detections.sort_by_key(|d| (d.start, d.end));

        Ok(detections)
    }
}
