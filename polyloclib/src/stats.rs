//! Summary data structures for scan results.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification result for one file.
///
/// Immutable; produced by the pipeline's classification stage and folded
/// into the owning language's [`LanguageSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Path as discovered by the walker
    pub path: PathBuf,
    /// Detected language name
    pub language: String,
    /// Extension (or full name) the lookup keyed on
    pub extension: String,
    /// File size in bytes
    pub bytes: u64,
    /// Raw line count
    pub lines: u64,
}

/// Aggregate statistics for all files detected as one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSummary {
    /// Language name (unique key in the summary mapping)
    pub name: String,
    /// Total bytes across `files`
    pub bytes: u64,
    /// Total lines across `files`
    pub lines: u64,
    /// Number of entries in `files`
    pub count: u64,
    /// Every file that contributed to the totals
    pub files: Vec<FileSummary>,
}

impl LanguageSummary {
    /// Create an empty summary for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fold one file into the running totals.
    ///
    /// The aggregate fields are only ever updated here, so they always
    /// equal the sum over `files`.
    pub fn add_file(&mut self, file: FileSummary) {
        debug_assert_eq!(self.name, file.language);
        self.bytes += file.bytes;
        self.lines += file.lines;
        self.count += 1;
        self.files.push(file);
    }

    /// Merge another summary for the same language into this one.
    ///
    /// Folding a partition of files in separate summaries and merging is
    /// equivalent to folding them all into one.
    pub fn merge(&mut self, other: LanguageSummary) {
        debug_assert_eq!(self.name, other.name);
        self.bytes += other.bytes;
        self.lines += other.lines;
        self.count += other.count;
        self.files.extend(other.files);
    }
}

/// Fold one file summary into the per-language mapping, creating the
/// language entry on first encounter.
pub fn fold(totals: &mut HashMap<String, LanguageSummary>, file: FileSummary) {
    totals
        .entry(file.language.clone())
        .or_insert_with(|| LanguageSummary::new(file.language.clone()))
        .add_file(file);
}
