//! Scan configuration.
//!
//! All behavior that the CLI (or any embedder) can tune is carried in an
//! explicit [`ScanOptions`] value threaded through the walker and the
//! pipeline; there is no process-wide mutable state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ignore::IGNORE_FILE;

/// Entry names excluded from every scan unless overridden: hidden entries
/// and version-control metadata. Ignore-rule files are hidden entries too,
/// so they never count toward language statistics.
pub const DEFAULT_EXCLUDES: &[&str] = &[".*", ".git", ".svn", ".hg"];

/// Cooperative cancellation handle shared by walker and workers.
///
/// Cheap to clone; callers keep one handle and hand the options (with a
/// clone inside) to [`scan`](crate::pipeline::scan). Cancellation stops
/// job production promptly and the pipeline drains what is already in
/// flight, returning a partial summary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options controlling a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Glob-style entry names excluded before any ignore-rule resolution
    pub excludes: Vec<String>,
    /// Skip subdirectories whose name starts with a dot
    pub skip_hidden: bool,
    /// Follow symlinked directories (off by default to avoid cycles)
    pub follow_symlinks: bool,
    /// Name of the per-directory ignore-rule file
    pub ignore_file: String,
    /// Classification worker count; `None` means available parallelism
    pub workers: Option<usize>,
    /// Cancellation handle checked by walker and workers
    pub cancel: CancelToken,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            skip_hidden: true,
            follow_symlinks: false,
            ignore_file: IGNORE_FILE.to_string(),
            workers: None,
            cancel: CancelToken::new(),
        }
    }
}

impl ScanOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclude-name pattern on top of the current list.
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.excludes.push(pattern.to_string());
        self
    }

    /// Replace the exclude-name list entirely.
    pub fn excludes(mut self, patterns: Vec<String>) -> Self {
        self.excludes = patterns;
        self
    }

    /// Builder: set hidden-directory skipping.
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Builder: set symlinked-directory traversal.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Builder: use a different ignore-rule file name.
    pub fn ignore_file(mut self, name: &str) -> Self {
        self.ignore_file = name.to_string();
        self
    }

    /// Builder: fix the classification worker count.
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = Some(count);
        self
    }

    /// Builder: attach a cancellation handle.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ScanOptions::default();
        assert!(opts.skip_hidden);
        assert!(!opts.follow_symlinks);
        assert_eq!(opts.ignore_file, IGNORE_FILE);
        assert!(opts.workers.is_none());
        assert!(opts.excludes.contains(&".git".to_string()));
    }

    #[test]
    fn test_builder_chain() {
        let opts = ScanOptions::new()
            .exclude("node_modules")
            .skip_hidden(false)
            .follow_symlinks(true)
            .workers(2);
        assert!(opts.excludes.contains(&"node_modules".to_string()));
        assert!(!opts.skip_hidden);
        assert!(opts.follow_symlinks);
        assert_eq!(opts.workers, Some(2));
    }

    #[test]
    fn test_cancel_token_is_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
