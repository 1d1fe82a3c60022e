//! Input expansion and per-file processing

use crate::output::{unique_output_path, write_atomic};
use anyhow::Context;
use blackout_core::Statistics;
use blackout_pii::{AnnotationSource, RedactionPipeline, SpanSource};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Where and how redacted files are written
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub output_suffix: String,

    /// Directory holding `<file>.entities.json` annotation sidecars
    pub annotations: Option<PathBuf>,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub statistics: Statistics,

    /// Inputs skipped because they could not be read or written
    pub failed_files: usize,

    /// Detector warnings across all files
    pub warnings: usize,
}

/// Expand input glob patterns into a list of files.
///
/// Order follows the patterns, then glob order within a pattern. Duplicates keep their first
/// position and directories are skipped.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let expanded = shellexpand::tilde(pattern);
        let mut matched = 0;

        for entry in glob::glob(&expanded).with_context(|| format!("invalid glob '{pattern}'"))? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "Unreadable glob entry");
                    continue;
                }
            };
            if path.is_dir() {
                debug!(path = %path.display(), "Skipping directory");
                continue;
            }
            matched += 1;
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }

        if matched == 0 {
            warn!(pattern = %pattern, "No files matched");
        }
    }

    Ok(files)
}

/// Redact every input and collect run statistics.
///
/// Unreadable inputs and unwritable outputs are logged and skipped. An internal invariant
/// violation stops the run.
pub fn run_batch(
    pipeline: &RedactionPipeline,
    inputs: &[PathBuf],
    options: &BatchOptions,
) -> anyhow::Result<BatchReport> {
    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "creating output directory {}",
            options.output_dir.display()
        )
    })?;

    let mut report = BatchReport::default();
    let mut written = HashSet::new();

    for input in inputs {
        let text = match std::fs::read_to_string(input) {
            Ok(text) => text,
            Err(e) => {
                error!(path = %input.display(), error = %e, "Failed to read input");
                report.failed_files += 1;
                continue;
            }
        };

        let mut extra: Vec<Box<dyn SpanSource>> = Vec::new();
        if let Some(dir) = &options.annotations {
            match AnnotationSource::for_input(dir, input) {
                Ok(source) => {
                    debug!(
                        path = %source.path().display(),
                        entities = source.entities().len(),
                        "Loaded annotations"
                    );
                    extra.push(Box::new(source));
                }
                Err(e) => {
                    warn!(input = %input.display(), error = %e, "Ignoring annotations");
                    report.warnings += 1;
                }
            }
        }

        let outcome = pipeline
            .process_with(&text, &extra)
            .with_context(|| format!("redacting {}", input.display()))?;

        let target = unique_output_path(
            &options.output_dir,
            input,
            &options.output_suffix,
            &written,
        );
        written.insert(target.clone());
        if let Err(e) = write_atomic(&target, outcome.redacted_text.as_bytes()) {
            error!(path = %target.display(), error = %e, "Failed to write output");
            report.failed_files += 1;
            continue;
        }

        report.warnings += outcome.warnings.len();
        let redactions = outcome.stats.redactions;
        let key = report.statistics.merge_file(input, outcome.stats);
        info!(
            file = %key,
            redactions,
            output = %target.display(),
            "Redacted file"
        );
    }

    Ok(report)
}
