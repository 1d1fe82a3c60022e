//! Sentence-level concept detector

use crate::detector::{ConceptConfig, SpanSource};
use aho_corasick::AhoCorasick;
use blackout_core::{Category, Detection, DetectionPayload, Error, Result, TextSnapshot};
use tracing::debug;

/// Words whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "inc", "ltd", "co", "no",
];

/// Scores how closely a sentence relates to a concept.
///
/// Implementations wrap an external similarity model. Scores are compared against the
/// detector's threshold; an error fails the whole concept pass for this source.
pub trait SentenceScorer: Send + Sync {
    fn score(&self, sentence: &str, concept: &str) -> Result<f32>;
}

/// Redacts whole sentences that relate to one of the configured concepts.
pub struct ConceptDetector {
    concepts: Vec<String>,
    matcher: Option<AhoCorasick>,
    /// Concept owning each matcher pattern, by pattern index
    pattern_concepts: Vec<String>,
    scorer: Option<(Box<dyn SentenceScorer>, f32)>,
}

impl ConceptDetector {
    /// Create a concept detector for the configured terms and their synonyms
    pub fn new(config: &ConceptConfig) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_concepts = Vec::new();

        for term in &config.terms {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            patterns.push(term.to_string());
            pattern_concepts.push(term.to_string());

            let synonyms = config
                .synonyms
                .iter()
                .filter(|(concept, _)| concept.eq_ignore_ascii_case(term))
                .flat_map(|(_, synonyms)| synonyms);
            for synonym in synonyms {
                if !synonym.trim().is_empty() {
                    patterns.push(synonym.trim().to_string());
                    pattern_concepts.push(term.to_string());
                }
            }
        }

        let matcher = if patterns.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(&patterns)
                    .map_err(|e| Error::Config(format!("invalid concept terms: {e}")))?,
            )
        };

        debug!(
            concepts = config.terms.len(),
            patterns = patterns.len(),
            "Built concept matcher"
        );

        Ok(Self {
            concepts: config.terms.clone(),
            matcher,
            pattern_concepts,
            scorer: None,
        })
    }

    /// Also match sentences the scorer rates at or above `threshold`
    pub fn with_scorer(mut self, scorer: Box<dyn SentenceScorer>, threshold: f32) -> Self {
        self.scorer = Some((scorer, threshold));
        self
    }

    fn match_sentence(&self, sentence: &str) -> Result<Option<(String, f32)>> {
        if let Some(found) = self.matcher.as_ref().and_then(|m| m.find(sentence)) {
            let concept = self.pattern_concepts[found.pattern().as_usize()].clone();
            return Ok(Some((concept, 1.0)));
        }

        if let Some((scorer, threshold)) = &self.scorer {
            for concept in &self.concepts {
                let score = scorer.score(sentence, concept)?;
                if score >= *threshold {
                    return Ok(Some((concept.clone(), score)));
                }
            }
        }

        Ok(None)
    }
}

impl SpanSource for ConceptDetector {
    fn name(&self) -> &str {
        "concepts"
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Concept]
    }

    fn detect(&self, snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        if self.concepts.is_empty() {
            return Ok(Vec::new());
        }

        let mut detections = Vec::new();
        for (start, end) in split_sentences(snapshot) {
            let Some(sentence) = snapshot.slice(start, end) else {
                continue;
            };
            if let Some((concept, score)) = self.match_sentence(sentence)? {
                detections.push(
                    Detection::new(Category::Concept, start, end)
                        .with_payload(DetectionPayload::Similarity { concept, score }),
                );
            }
        }

        Ok(detections)
    }
}

/// Split a snapshot into sentences, returned as code-point ranges.
///
/// A sentence runs from its first non-whitespace character through its terminator
/// (`.`, `!` or `?` plus any closing quotes or brackets) when the terminator is followed by
/// whitespace or the end of text. Known abbreviations and single-letter initials do not end
/// a sentence. A blank line always ends one.
pub fn split_sentences(snapshot: &TextSnapshot) -> Vec<(usize, usize)> {
    let chars: Vec<char> = snapshot.chars().collect();
    let len = chars.len();
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut content_end = 0;
    let mut i = 0;

    while i < len {
        let c = chars[i];

        if c == '\n' && is_blank_line_ahead(&chars, i + 1) {
            if let Some(s) = start.take() {
                sentences.push((s, content_end));
            }
            i += 1;
            continue;
        }

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let sentence_start = *start.get_or_insert(i);
        content_end = i + 1;

        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Terminator run, e.g. `?!` or `."`
        let mut j = i + 1;
        while j < len && matches!(chars[j], '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '”' | '’')
        {
            j += 1;
        }

        let at_boundary = j == len || chars[j].is_whitespace();
        if at_boundary && !(c == '.' && j == i + 1 && is_abbreviation(&chars, sentence_start, i)) {
            sentences.push((sentence_start, j));
            start = None;
        }
        content_end = j;
        i = j;
    }

    if let Some(s) = start {
        sentences.push((s, content_end));
    }

    sentences
}

/// Whether only horizontal whitespace separates `from` from the next line break
fn is_blank_line_ahead(chars: &[char], from: usize) -> bool {
    chars[from.min(chars.len())..]
        .iter()
        .take_while(|c| matches!(**c, ' ' | '\t' | '\r' | '\n'))
        .any(|c| *c == '\n')
}

/// Whether the word ending just before the period at `dot` is an abbreviation or initial
fn is_abbreviation(chars: &[char], sentence_start: usize, dot: usize) -> bool {
    let mut word_start = dot;
    while word_start > sentence_start && !chars[word_start - 1].is_whitespace() {
        word_start -= 1;
    }
    let word: String = chars[word_start..dot]
        .iter()
        .skip_while(|c| !c.is_alphanumeric())
        .collect();

    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        return first.is_uppercase();
    }

    let word = word.to_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const SEASONS: &str = "We went to the beach last summer. The cold winter this year was tough. \
                           Summertime brings joy to everyone. Winter sports, however, are also fun.";

    fn config(terms: &[&str]) -> ConceptConfig {
        ConceptConfig {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            synonyms: BTreeMap::new(),
        }
    }

    fn sentences(text: &str) -> Vec<String> {
        let snapshot = TextSnapshot::new(text);
        split_sentences(&snapshot)
            .into_iter()
            .map(|(s, e)| snapshot.slice(s, e).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_split_basic_sentences() {
        assert_eq!(
            sentences("Hello world. Is this working? Yes it is! Final"),
            vec!["Hello world.", "Is this working?", "Yes it is!", "Final"]
        );
    }

    #[test]
    fn test_split_keeps_abbreviations_and_initials() {
        assert_eq!(
            sentences("Mr. John A. Doe met Dr. Smith etc. today. Done."),
            vec!["Mr. John A. Doe met Dr. Smith etc. today.", "Done."]
        );
    }

    #[test]
    fn test_split_closing_quote_belongs_to_sentence() {
        assert_eq!(
            sentences("He said \"stop.\" Then left."),
            vec!["He said \"stop.\"", "Then left."]
        );
    }

    #[test]
    fn test_blank_line_ends_sentence() {
        assert_eq!(
            sentences("Subject line without period\n\n  Body starts here."),
            vec!["Subject line without period", "Body starts here."]
        );
    }

    #[test]
    fn test_single_newline_does_not_end_sentence() {
        assert_eq!(
            sentences("wrapped over\ntwo lines. next"),
            vec!["wrapped over\ntwo lines.", "next"]
        );
    }

    #[test]
    fn test_split_empty() {
        assert!(sentences("").is_empty());
        assert!(sentences("   \n\n ").is_empty());
    }

    #[test]
    fn test_concept_substring_match() {
        let snapshot = TextSnapshot::new(SEASONS);
        let detector = ConceptDetector::new(&config(&["summer"])).unwrap();
        let detections = detector.detect(&snapshot).unwrap();

        let ranges: Vec<(usize, usize)> = detections.iter().map(|d| (d.start, d.end)).collect();
        assert_eq!(ranges, vec![(0, 33), (71, 105)]);
        assert!(matches!(
            &detections[1].payload,
            DetectionPayload::Similarity { concept, .. } if concept == "summer"
        ));
    }

    #[test]
    fn test_synonyms_match_for_their_concept() {
        let mut cfg = config(&["Winter"]);
        cfg.synonyms
            .insert("winter".to_string(), vec!["snow".to_string()]);
        let detector = ConceptDetector::new(&cfg).unwrap();
        let snapshot = TextSnapshot::new("It will SNOW tomorrow. Bring a hat.");

        let detections = detector.detect(&snapshot).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!((detections[0].start, detections[0].end), (0, 22));
    }

    #[test]
    fn test_no_terms_no_detections() {
        let detector = ConceptDetector::new(&config(&[])).unwrap();
        let snapshot = TextSnapshot::new(SEASONS);
        assert!(detector.detect(&snapshot).unwrap().is_empty());
    }

    struct LengthScorer;

    impl SentenceScorer for LengthScorer {
        fn score(&self, sentence: &str, _concept: &str) -> Result<f32> {
            Ok(if sentence.contains("beach") { 0.9 } else { 0.1 })
        }
    }

    struct FailingScorer;

    impl SentenceScorer for FailingScorer {
        fn score(&self, _sentence: &str, _concept: &str) -> Result<f32> {
            Err(Error::detector("scorer", "model unavailable"))
        }
    }

    #[test]
    fn test_scorer_above_threshold() {
        let detector = ConceptDetector::new(&config(&["holiday"]))
            .unwrap()
            .with_scorer(Box::new(LengthScorer), 0.5);
        let snapshot = TextSnapshot::new(SEASONS);

        let detections = detector.detect(&snapshot).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!((detections[0].start, detections[0].end), (0, 33));
    }

    #[test]
    fn test_scorer_error_propagates() {
        let detector = ConceptDetector::new(&config(&["holiday"]))
            .unwrap()
            .with_scorer(Box::new(FailingScorer), 0.5);
        let snapshot = TextSnapshot::new(SEASONS);

        assert!(detector.detect(&snapshot).is_err());
    }
}
