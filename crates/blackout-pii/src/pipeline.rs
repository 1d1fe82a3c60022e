//! Per-file category passes

use crate::detector::{
    AddressDetector, ConceptConfig, ConceptDetector, DateDetector, DetectorConfig, NameDetector,
    PhoneDetector, SpanSource,
};
use crate::redactor::{apply_plan, normalize, resolve};
use blackout_core::{Category, FileStats, Result, TextSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which category passes run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    #[serde(default)]
    pub names: bool,

    #[serde(default)]
    pub dates: bool,

    #[serde(default)]
    pub phones: bool,

    #[serde(default)]
    pub address: bool,

    /// Concept terms; the concept pass runs when this is not empty
    #[serde(default)]
    pub concepts: Vec<String>,
}

impl CategoryFlags {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Name => self.names,
            Category::Date => self.dates,
            Category::Phone => self.phones,
            Category::Address => self.address,
            Category::Concept => !self.concepts.is_empty(),
        }
    }

    /// Enabled categories in pass order
    pub fn enabled(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

/// Redacted text and statistics for one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub redacted_text: String,
    pub stats: FileStats,

    /// Detector failures that degraded a pass
    pub warnings: Vec<String>,
}

struct CategoryPass {
    category: Category,
    sources: Vec<Box<dyn SpanSource>>,
}

/// Runs the enabled category passes over a document.
///
/// Passes run in the fixed order names, dates, phones, addresses, concepts. Each pass
/// detects on the output of the passes before it and commits its whole plan before the next
/// one starts.
#[derive(Default)]
pub struct RedactionPipeline {
    passes: Vec<CategoryPass>,
}

impl RedactionPipeline {
    /// Pipeline without any passes
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the built-in sources for every enabled category
    pub fn from_config(flags: &CategoryFlags, config: &DetectorConfig) -> Result<Self> {
        let mut pipeline = Self::new();

        for category in flags.enabled() {
            let source: Box<dyn SpanSource> = match category {
                Category::Name => Box::new(NameDetector::new(&config.names)?),
                Category::Date => Box::new(DateDetector::new()?),
                Category::Phone => Box::new(PhoneDetector::new(&config.phones)?),
                Category::Address => Box::new(AddressDetector::new()?),
                Category::Concept => {
                    let mut terms = flags.concepts.clone();
                    for term in &config.concepts.terms {
                        if !terms.contains(term) {
                            terms.push(term.clone());
                        }
                    }
                    Box::new(ConceptDetector::new(&ConceptConfig {
                        terms,
                        synonyms: config.concepts.synonyms.clone(),
                    })?)
                }
            };
            pipeline.add_source(category, source);
        }

        Ok(pipeline)
    }

    /// Add a source to the pass for `category`, creating the pass if needed
    pub fn add_source(&mut self, category: Category, source: Box<dyn SpanSource>) {
        match self.passes.iter_mut().find(|p| p.category == category) {
            Some(pass) => pass.sources.push(source),
            None => {
                self.passes.push(CategoryPass {
                    category,
                    sources: vec![source],
                });
                self.passes.sort_by_key(|p| p.category);
            }
        }
    }

    /// Categories with a pass, in run order
    pub fn categories(&self) -> Vec<Category> {
        self.passes.iter().map(|p| p.category).collect()
    }

    /// Redact `text` with the configured sources
    pub fn process(&self, text: &str) -> Result<FileOutcome> {
        self.process_with(text, &[])
    }

    /// Redact `text`, also consulting file-specific `extra` sources.
    ///
    /// Extra sources join every existing pass whose category they support. A failing source
    /// contributes nothing to its pass and is reported in the outcome's warnings. An invariant
    /// violation aborts the file.
    pub fn process_with(&self, text: &str, extra: &[Box<dyn SpanSource>]) -> Result<FileOutcome> {
        let mut snapshot = TextSnapshot::new(text);
        let mut stats = FileStats::new();
        let mut warnings = Vec::new();

        for pass in &self.passes {
            let category = pass.category;
            let sources = pass.sources.iter().chain(
                extra
                    .iter()
                    .filter(|s| s.supported_categories().contains(&category)),
            );

            let mut detections = Vec::new();
            for source in sources {
                match source.detect(&snapshot) {
                    Ok(found) => {
                        debug!(
                            category = %category,
                            source = source.name(),
                            detections = found.len(),
                            "Source finished"
                        );
                        detections.extend(found.into_iter().filter(|d| d.category == category));
                    }
                    Err(e) if e.is_internal() => return Err(e),
                    Err(e) => {
                        warn!(category = %category, source = source.name(), error = %e, "Span source failed");
                        warnings.push(format!("{} pass: {e}", category.plural()));
                    }
                }
            }

            let candidates = normalize(&snapshot, detections);
            let plan = resolve(candidates);
            let masked = apply_plan(&snapshot, &plan)?;

            debug!(
                category = %category,
                redactions = masked.records.len(),
                "Pass committed"
            );

            stats.record_pass(&masked.records);
            snapshot = masked.snapshot;
        }

        Ok(FileOutcome {
            redacted_text: snapshot.into_string(),
            stats,
            warnings,
        })
    }
}
