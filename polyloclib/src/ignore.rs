//! Per-directory ignore rule accumulation.
//!
//! Each directory that carries an ignore-rule file gets its own
//! [`IgnoreSet`], linked to the parent directory's set. The chain is
//! immutable and shared read-only by every descendant traversal frame, so
//! a rule file discovered in one subtree can never leak into a sibling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::PolylocError;
use crate::pattern::{compile_lines, IgnoreRule};
use crate::Result;

/// Conventional name of the per-directory ignore-rule file.
pub const IGNORE_FILE: &str = ".gitignore";

/// An ordered rule sequence scoped to one directory, plus the inherited
/// chain from ancestor directories.
#[derive(Debug)]
pub struct IgnoreSet {
    /// Directory the rule file lives in; rules match relative to it
    base: PathBuf,
    rules: Vec<IgnoreRule>,
    parent: Option<Arc<IgnoreSet>>,
    /// Whether this chain (self or any ancestor) carries a negation rule
    has_negations: bool,
}

impl IgnoreSet {
    /// Compile a rule set from raw lines, scoped to `base`.
    pub fn compile<'a>(
        base: impl Into<PathBuf>,
        lines: impl IntoIterator<Item = &'a str>,
        parent: Option<Arc<IgnoreSet>>,
    ) -> Result<IgnoreSet> {
        let rules = compile_lines(lines)?;
        let has_negations = rules.iter().any(IgnoreRule::negated)
            || parent.as_ref().is_some_and(|p| p.has_negations);
        Ok(IgnoreSet {
            base: base.into(),
            rules,
            parent,
            has_negations,
        })
    }

    /// Read and compile the ignore file at `path`, scoped to its directory.
    ///
    /// A read failure surfaces as [`PolylocError::IgnoreFileRead`]; callers
    /// degrade to the parent chain rather than aborting the walk.
    pub fn load(path: &Path, parent: Option<Arc<IgnoreSet>>) -> Result<IgnoreSet> {
        let text = fs::read_to_string(path).map_err(|source| PolylocError::IgnoreFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        IgnoreSet::compile(base, text.lines(), parent)
    }

    /// Directory this set's rules are declared in.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Number of rules declared in this scope (not counting ancestors).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule in the chain is a negation.
    ///
    /// The walker uses this to decide between pruning an excluded
    /// directory and descending so a deeper rule can restore entries.
    pub fn has_negations(&self) -> bool {
        self.has_negations
    }

    /// Polarity of the last matching rule across the chain.
    ///
    /// Scopes are consulted root-to-leaf and rules in declaration order;
    /// a later match overrides an earlier one, which is what makes
    /// negation work. `Some(true)` means excluded, `Some(false)` means
    /// explicitly restored, `None` means no rule matched.
    pub fn matched(&self, path: &Path, is_dir: bool) -> Option<bool> {
        let inherited = self
            .parent
            .as_ref()
            .and_then(|parent| parent.matched(path, is_dir));

        let own = path.strip_prefix(&self.base).ok().and_then(|relative| {
            let mut verdict = None;
            for rule in &self.rules {
                if rule.dir_only() && !is_dir {
                    continue;
                }
                if rule.matches(relative) {
                    verdict = Some(!rule.negated());
                }
            }
            verdict
        });

        own.or(inherited)
    }

    /// Whether the chain excludes `path` outright.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        self.matched(path, is_dir).unwrap_or(false)
    }
}
