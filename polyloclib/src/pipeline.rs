//! Staged scan pipeline: walker, classification workers, aggregator.
//!
//! Stages are connected by bounded channels. The walker thread owns the
//! file-job sender and drops it when traversal ends; workers own clones of
//! the summary sender and drop them when the job channel disconnects. The
//! aggregator therefore learns completion from channel disconnection (an
//! explicit "no more producers" signal), never from a momentarily empty
//! queue.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::bounded;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::PolylocError;
use crate::language;
use crate::options::ScanOptions;
use crate::stats::{fold, FileSummary, LanguageSummary};
use crate::walker::Walker;
use crate::Result;

/// Capacity of the stage channels.
const CHANNEL_CAP: usize = 1024;

/// Why one file produced no [`FileSummary`].
///
/// None of these abort a scan; the pipeline logs them and moves on. The
/// variants exist so callers and tests can tell a binary file from a
/// vanished one from a permission problem.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Content is not valid text
    #[error("binary file: {0}")]
    Binary(PathBuf),

    /// File disappeared between discovery and read
    #[error("file vanished: {0}")]
    Vanished(PathBuf),

    /// Read permission denied
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other read failure
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    /// Name maps to no known language and no shebang resolved
    #[error("unable to detect language: {0}")]
    UnknownLanguage(PathBuf),

    /// Name maps to several languages and nothing disambiguates them
    #[error("ambiguous language for '{path}': {candidates:?}")]
    AmbiguousLanguage {
        path: PathBuf,
        candidates: Vec<&'static str>,
    },
}

fn read_error(path: &Path, err: io::Error) -> ClassifyError {
    match err.kind() {
        io::ErrorKind::NotFound => ClassifyError::Vanished(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => ClassifyError::PermissionDenied(path.to_path_buf()),
        _ => ClassifyError::Read {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

/// Classify a single file: size, language, raw line count.
pub fn classify(path: &Path) -> std::result::Result<FileSummary, ClassifyError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClassifyError::UnknownLanguage(path.to_path_buf()))?;

    let (candidates, extension) = language::candidates_for_name(&name);

    let metadata = fs::metadata(path).map_err(|e| read_error(path, e))?;
    let raw = fs::read(path).map_err(|e| read_error(path, e))?;
    let content =
        String::from_utf8(raw).map_err(|_| ClassifyError::Binary(path.to_path_buf()))?;

    let Some(detected) = language::detect(&candidates, &content) else {
        return Err(if candidates.len() > 1 {
            ClassifyError::AmbiguousLanguage {
                path: path.to_path_buf(),
                candidates,
            }
        } else {
            ClassifyError::UnknownLanguage(path.to_path_buf())
        });
    };

    Ok(FileSummary {
        path: path.to_path_buf(),
        language: detected.to_string(),
        extension,
        bytes: metadata.len(),
        lines: content.lines().count() as u64,
    })
}

/// Completed scan: per-language aggregates keyed by language name.
///
/// This mapping is the whole contract with the renderer; each
/// [`LanguageSummary`] already carries its contributing files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub languages: HashMap<String, LanguageSummary>,
}

impl ScanReport {
    /// Total number of classified files across all languages.
    pub fn total_files(&self) -> u64 {
        self.languages.values().map(|l| l.count).sum()
    }
}

/// Scan `start` and aggregate per-language statistics.
///
/// The only hard failure is a start path that does not exist. Unreadable
/// directories, broken ignore files, binary or vanished files, and
/// unclassifiable names all degrade locally and are logged.
pub fn scan(start: &Path, options: &ScanOptions) -> Result<ScanReport> {
    if !start.exists() {
        return Err(PolylocError::PathNotFound(start.to_path_buf()));
    }

    let workers = options.workers.unwrap_or_else(|| {
        thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4)
    });

    let (file_tx, file_rx) = bounded(CHANNEL_CAP);
    let (summary_tx, summary_rx) = bounded::<FileSummary>(CHANNEL_CAP);

    let walker = Walker::new(options, file_tx)?;
    let cancel = options.cancel.clone();

    let mut languages = HashMap::new();
    thread::scope(|scope| {
        // The walker owns the job sender; moving it into the thread makes
        // the sender drop when traversal ends, which is the workers'
        // completion signal.
        scope.spawn(move || walker.walk(start));

        for _ in 0..workers.max(1) {
            let jobs = file_rx.clone();
            let summaries = summary_tx.clone();
            let cancel = cancel.clone();
            scope.spawn(move || {
                for job in jobs.iter() {
                    // Keep draining after cancellation so the walker never
                    // blocks on a full channel; just stop doing the work.
                    if cancel.is_cancelled() {
                        continue;
                    }
                    match classify(&job.path) {
                        Ok(summary) => {
                            if summaries.send(summary).is_err() {
                                return;
                            }
                        }
                        Err(err) => debug!(%err, "skipping file"),
                    }
                }
            });
        }
        // The scope's own handles must go away, or the iterators below
        // would never see disconnection.
        drop(file_rx);
        drop(summary_tx);

        for summary in summary_rx.iter() {
            fold(&mut languages, summary);
        }
    });

    Ok(ScanReport { languages })
}
