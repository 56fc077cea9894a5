//! Gitignore-aware directory traversal.
//!
//! The walker drives an explicit work queue of [`DirectoryJob`]s instead of
//! recursing. Each visited directory builds its child ignore scope from the
//! inherited chain plus any rule file found among its entries, then filters
//! entries through the static exclude list and the chain before emitting
//! [`FileJob`]s into the pipeline's channel.
//!
//! Failure semantics: an unreadable directory or a broken ignore file
//! degrades that subtree only. The walk itself never aborts.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Sender;
use glob::Pattern;
use tracing::{debug, warn};

use crate::error::PolylocError;
use crate::ignore::IgnoreSet;
use crate::options::{CancelToken, ScanOptions};
use crate::Result;

/// One directory waiting to be visited.
///
/// Created when a subdirectory is discovered, consumed exactly once. The
/// ignore chain it carries may outlive it, shared by child jobs.
#[derive(Debug)]
pub struct DirectoryJob {
    /// Directory to list
    pub path: PathBuf,
    /// Start path of the walk
    pub root: PathBuf,
    /// Ignore chain accumulated from ancestor directories
    pub ignores: Option<Arc<IgnoreSet>>,
    /// Whether an ancestor directory was excluded; entries with no rule
    /// match of their own inherit this
    pub excluded: bool,
}

/// One accepted file, ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub path: PathBuf,
}

/// Traverses a tree and emits accepted files into a channel.
pub struct Walker {
    excludes: Vec<Pattern>,
    skip_hidden: bool,
    follow_symlinks: bool,
    ignore_file: String,
    cancel: CancelToken,
    sink: Sender<FileJob>,
}

impl Walker {
    /// Build a walker from scan options.
    ///
    /// The exclude-name list is user configuration, so a malformed pattern
    /// here is a hard error rather than a logged degradation.
    pub fn new(options: &ScanOptions, sink: Sender<FileJob>) -> Result<Walker> {
        let mut excludes = Vec::with_capacity(options.excludes.len());
        for raw in &options.excludes {
            let pattern = Pattern::new(raw).map_err(|e| PolylocError::InvalidPattern {
                pattern: raw.clone(),
                message: e.to_string(),
            })?;
            excludes.push(pattern);
        }
        Ok(Walker {
            excludes,
            skip_hidden: options.skip_hidden,
            follow_symlinks: options.follow_symlinks,
            ignore_file: options.ignore_file.clone(),
            cancel: options.cancel.clone(),
            sink,
        })
    }

    /// Walk from `start`, emitting every accepted file.
    ///
    /// A start path that is a file is emitted as-is with no traversal.
    /// Returns when the work queue drains, the cancellation token fires,
    /// or the receiving side of the channel goes away.
    pub fn walk(&self, start: &Path) {
        if !start.is_dir() {
            let _ = self.sink.send(FileJob {
                path: start.to_path_buf(),
            });
            return;
        }

        let mut queue = VecDeque::new();
        queue.push_back(DirectoryJob {
            path: start.to_path_buf(),
            root: start.to_path_buf(),
            ignores: None,
            excluded: false,
        });

        while let Some(job) = queue.pop_front() {
            if self.cancel.is_cancelled() {
                debug!(pending = queue.len(), "walk cancelled");
                return;
            }
            if !self.visit(job, &mut queue) {
                return;
            }
        }
    }

    /// Process one directory job. Returns false when the file channel is
    /// disconnected and the walk should stop.
    fn visit(&self, job: DirectoryJob, queue: &mut VecDeque<DirectoryJob>) -> bool {
        debug!(path = %job.path.display(), "walking");

        let entries: Vec<fs::DirEntry> = match fs::read_dir(&job.path) {
            Ok(iter) => iter
                .filter_map(|entry| match entry {
                    Ok(e) => Some(e),
                    Err(err) => {
                        warn!(path = %job.path.display(), %err, "skipping unreadable entry");
                        None
                    }
                })
                .collect(),
            Err(err) => {
                warn!(path = %job.path.display(), %err, "failed to list directory, skipping subtree");
                return true;
            }
        };

        let ignores = self.child_scope(&job, &entries);

        for entry in entries {
            if self.cancel.is_cancelled() {
                return false;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            let path = entry.path();

            let (is_dir, is_symlink) = match entry_kind(&entry) {
                Some(kind) => kind,
                None => continue,
            };

            if self.is_name_excluded(&name) {
                debug!(path = %path.display(), "excluded by static list");
                continue;
            }
            if is_dir && self.skip_hidden && name.starts_with('.') {
                debug!(path = %path.display(), "skipping hidden directory");
                continue;
            }
            if is_dir && is_symlink && !self.follow_symlinks {
                debug!(path = %path.display(), "not following symlinked directory");
                continue;
            }

            let verdict = ignores.as_ref().and_then(|set| set.matched(&path, is_dir));
            let excluded = verdict.unwrap_or(job.excluded);

            if is_dir {
                // An excluded directory is still descended when the chain
                // carries negations, so a deeper rule can restore entries.
                let may_reinclude = ignores.as_ref().is_some_and(|set| set.has_negations());
                if excluded && !may_reinclude {
                    debug!(path = %path.display(), "pruned by ignore rules");
                    continue;
                }
                queue.push_back(DirectoryJob {
                    path,
                    root: job.root.clone(),
                    ignores: ignores.clone(),
                    excluded,
                });
            } else if excluded {
                debug!(path = %path.display(), "excluded by ignore rules");
            } else if self.sink.send(FileJob { path }).is_err() {
                return false;
            }
        }

        true
    }

    /// Build this directory's ignore scope: the inherited chain, extended
    /// with the directory's own rule file when one exists and parses.
    fn child_scope(
        &self,
        job: &DirectoryJob,
        entries: &[fs::DirEntry],
    ) -> Option<Arc<IgnoreSet>> {
        let present = entries
            .iter()
            .any(|e| e.file_name().to_string_lossy() == self.ignore_file);
        if !present {
            return job.ignores.clone();
        }

        let rule_path = job.path.join(&self.ignore_file);
        match IgnoreSet::load(&rule_path, job.ignores.clone()) {
            Ok(set) => {
                debug!(path = %rule_path.display(), rules = set.len(), "loaded ignore file");
                Some(Arc::new(set))
            }
            Err(err) => {
                warn!(path = %rule_path.display(), %err, "ignoring unusable ignore file");
                job.ignores.clone()
            }
        }
    }

    fn is_name_excluded(&self, name: &str) -> bool {
        self.excludes.iter().any(|pattern| pattern.matches(name))
    }
}

/// Resolve an entry to (is_dir, is_symlink), following the link for
/// directory-ness so symlink policy can be applied explicitly.
fn entry_kind(entry: &fs::DirEntry) -> Option<(bool, bool)> {
    let file_type = match entry.file_type() {
        Ok(ft) => ft,
        Err(err) => {
            warn!(path = %entry.path().display(), %err, "cannot stat entry, skipping");
            return None;
        }
    };
    if !file_type.is_symlink() {
        return Some((file_type.is_dir(), false));
    }
    match fs::metadata(entry.path()) {
        Ok(meta) => Some((meta.is_dir(), true)),
        // Dangling symlink: let classification report it if anything does
        Err(_) => Some((false, true)),
    }
}
