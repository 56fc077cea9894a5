//! # polyloclib
//!
//! A gitignore-aware source tree scanner that classifies files by language
//! and aggregates per-language line statistics.
//!
//! ## Overview
//!
//! The library is a staged pipeline:
//!
//! - **Walker**: traverses the tree with an explicit work queue,
//!   accumulating nested ignore-rule scopes as it descends
//! - **Classification**: reads each accepted file, detects its language
//!   from its name (or shebang line), and counts raw lines
//! - **Aggregation**: folds per-file summaries into per-language totals
//!
//! Stages run as a worker pool over bounded channels; ignore scopes are
//! immutable and shared, so traversal is safe to parallelize and a rule
//! file in one subtree can never affect a sibling.
//!
//! ## Features
//!
//! - **Gitignore semantics**: anchoring, negation, directory-only rules,
//!   `*`/`?`/`[...]`/`**` wildcards, nested rule files
//! - **Fail-soft scanning**: unreadable directories, binary files, and
//!   unclassifiable names degrade locally and are logged, never fatal
//! - **Pure Rust data types**: returns structured summaries, rendering is
//!   the caller's concern
//!
//! ## Example
//!
//! ```rust
//! use polyloclib::{scan, ScanOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("a.py"), "print('hi')\n").unwrap();
//! fs::write(dir.path().join(".gitignore"), "*.pyc\n").unwrap();
//! fs::write(dir.path().join("a.pyc"), [0u8, 1, 2]).unwrap();
//!
//! let report = scan(dir.path(), &ScanOptions::default()).unwrap();
//! assert_eq!(report.languages["Python"].count, 1);
//! assert_eq!(report.total_files(), 1);
//! ```

pub mod error;
pub mod ignore;
pub mod language;
pub mod options;
pub mod pattern;
pub mod pipeline;
pub mod stats;
pub mod walker;

pub use error::PolylocError;
pub use ignore::{IgnoreSet, IGNORE_FILE};
pub use options::{CancelToken, ScanOptions, DEFAULT_EXCLUDES};
pub use pattern::IgnoreRule;
pub use pipeline::{classify, scan, ClassifyError, ScanReport};
pub use stats::{FileSummary, LanguageSummary};
pub use walker::{DirectoryJob, FileJob, Walker};

/// Result type for polyloclib operations
pub type Result<T> = std::result::Result<T, PolylocError>;
