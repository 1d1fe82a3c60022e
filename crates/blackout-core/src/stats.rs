//! Redaction statistics and their accumulation
//!
//! A `FileStats` is built up pass by pass while a single file is processed and is merged into
//! the run-wide `Statistics` once every enabled pass for that file has completed. Both levels
//! keep `redactions == redaction_counts.total()`.

use crate::category::Category;
use crate::span::RedactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Redaction counts keyed by category.
///
/// Every category is always present, a category with no matches simply reports 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionCounts {
    pub names: usize,
    pub dates: usize,
    pub phones: usize,
    pub addresses: usize,
    pub concepts: usize,
}

impl RedactionCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Name => self.names,
            Category::Date => self.dates,
            Category::Phone => self.phones,
            Category::Address => self.addresses,
            Category::Concept => self.concepts,
        }
    }

    pub fn add(&mut self, category: Category, count: usize) {
        let slot = match category {
            Category::Name => &mut self.names,
            Category::Date => &mut self.dates,
            Category::Phone => &mut self.phones,
            Category::Address => &mut self.addresses,
            Category::Concept => &mut self.concepts,
        };
        *slot += count;
    }

    pub fn merge(&mut self, other: &RedactionCounts) {
        for category in Category::ALL {
            self.add(category, other.get(category));
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// Per-file redaction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub redactions: usize,
    pub redaction_counts: RedactionCounts,
    pub offsets: Vec<RedactionRecord>,
}

impl FileStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the records committed by one category pass into this file's tally
    pub fn record_pass(&mut self, records: &[RedactionRecord]) {
        for record in records {
            self.redaction_counts.add(record.category, 1);
        }
        self.redactions += records.len();
        self.offsets.extend_from_slice(records);
    }

    pub fn is_consistent(&self) -> bool {
        self.redactions == self.redaction_counts.total() && self.redactions == self.offsets.len()
    }
}

/// Run-wide redaction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub files_processed: usize,
    pub total_redactions: usize,
    pub redaction_counts: RedactionCounts,
    pub file_stats: BTreeMap<String, FileStats>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a finished file into the run totals.
    ///
    /// The entry is keyed by the file name; if that key is already taken by another input the
    /// full path is used instead so no entry is ever overwritten. Returns the key used.
    pub fn merge_file(&mut self, path: &Path, stats: FileStats) -> String {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut key = if self.file_stats.contains_key(&file_name) {
            path.display().to_string()
        } else {
            file_name
        };
        let mut suffix = 1;
        while self.file_stats.contains_key(&key) {
            suffix += 1;
            key = format!("{} ({})", path.display(), suffix);
        }

        self.files_processed += 1;
        self.total_redactions += stats.redactions;
        self.redaction_counts.merge(&stats.redaction_counts);
        self.file_stats.insert(key.clone(), stats);
        key
    }

    /// Check the count-consistency invariants across all levels
    pub fn is_consistent(&self) -> bool {
        let per_file: usize = self.file_stats.values().map(|f| f.redactions).sum();
        self.total_redactions == self.redaction_counts.total()
            && per_file == self.total_redactions
            && self.file_stats.values().all(FileStats::is_consistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, start: usize, end: usize) -> RedactionRecord {
        RedactionRecord {
            category,
            start,
            end,
        }
    }

    #[test]
    fn test_counts_default_to_zero() {
        let json = serde_json::to_value(RedactionCounts::default()).unwrap();
        for category in Category::ALL {
            assert_eq!(json[category.plural()], 0);
        }
    }

    #[test]
    fn test_record_pass_accumulates() {
        let mut stats = FileStats::new();
        stats.record_pass(&[record(Category::Name, 0, 4), record(Category::Name, 10, 14)]);
        stats.record_pass(&[]);
        stats.record_pass(&[record(Category::Date, 20, 30)]);

        assert_eq!(stats.redactions, 3);
        assert_eq!(stats.redaction_counts.names, 2);
        assert_eq!(stats.redaction_counts.dates, 1);
        assert_eq!(stats.redaction_counts.phones, 0);
        assert_eq!(stats.offsets.len(), 3);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_merge_file_totals() {
        let mut run = Statistics::new();
        let mut a = FileStats::new();
        a.record_pass(&[record(Category::Phone, 0, 12)]);
        let mut b = FileStats::new();
        b.record_pass(&[record(Category::Concept, 0, 30), record(Category::Concept, 31, 40)]);

        run.merge_file(Path::new("in/a.txt"), a);
        run.merge_file(Path::new("in/b.txt"), b);

        assert_eq!(run.files_processed, 2);
        assert_eq!(run.total_redactions, 3);
        assert_eq!(run.redaction_counts.phones, 1);
        assert_eq!(run.redaction_counts.concepts, 2);
        assert!(run.is_consistent());
    }

    #[test]
    fn test_colliding_file_names_keep_both_entries() {
        let mut run = Statistics::new();
        let mut first = FileStats::new();
        first.record_pass(&[record(Category::Name, 0, 3)]);
        let mut second = FileStats::new();
        second.record_pass(&[record(Category::Name, 5, 9)]);

        let k1 = run.merge_file(Path::new("one/mail.txt"), first);
        let k2 = run.merge_file(Path::new("two/mail.txt"), second);

        assert_eq!(k1, "mail.txt");
        assert_ne!(k1, k2);
        assert_eq!(run.file_stats.len(), 2);
        assert!(run.is_consistent());
    }

    #[test]
    fn test_statistics_json_shape() {
        let mut run = Statistics::new();
        let mut file = FileStats::new();
        file.record_pass(&[record(Category::Address, 2, 9)]);
        run.merge_file(Path::new("letter.txt"), file);

        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["files_processed"], 1);
        assert_eq!(json["total_redactions"], 1);
        assert_eq!(json["redaction_counts"]["addresses"], 1);
        assert_eq!(json["file_stats"]["letter.txt"]["redactions"], 1);
        assert_eq!(json["file_stats"]["letter.txt"]["offsets"][0]["type"], "address");
    }
}
