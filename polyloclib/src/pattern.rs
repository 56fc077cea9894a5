//! Gitignore pattern compilation and matching.
//!
//! One [`IgnoreRule`] corresponds to one line of an ignore-rule file,
//! compiled into per-segment glob patterns. The gitignore layer built here
//! covers anchoring, negation, directory-only rules, and `**` spanning;
//! single-segment wildcards (`*`, `?`, `[...]`) are delegated to
//! [`glob::Pattern`], which never crosses a separator because segments
//! contain none.

use std::path::Path;

use glob::Pattern;

use crate::error::PolylocError;
use crate::Result;

/// One compiled path segment of an ignore rule.
#[derive(Debug, Clone)]
enum Segment {
    /// `**`: spans zero or more directories
    Globstar,
    /// Any other segment, matched against a single path component
    Glob(Pattern),
}

/// A single compiled ignore rule.
///
/// Immutable once compiled; rules are evaluated in declaration order with
/// the last matching rule's polarity winning (see
/// [`IgnoreSet`](crate::ignore::IgnoreSet)).
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    raw: String,
    negated: bool,
    dir_only: bool,
    anchored: bool,
    segments: Vec<Segment>,
}

impl IgnoreRule {
    /// Compile one line of ignore-rule text.
    ///
    /// Returns `Ok(None)` for blank lines and comments. Malformed wildcard
    /// syntax is reported here, never deferred to match time.
    pub fn parse(line: &str) -> Result<Option<IgnoreRule>> {
        let raw = line.to_string();
        // Trailing whitespace is insignificant in gitignore syntax.
        let mut text = line.trim_end();

        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }

        let negated = text.starts_with('!');
        if negated {
            text = &text[1..];
        }
        // `\#` and `\!` escape the comment/negation markers.
        if let Some(rest) = text.strip_prefix('\\') {
            if rest.starts_with('#') || rest.starts_with('!') {
                text = rest;
            }
        }

        let dir_only = text.ends_with('/');
        let text = text.trim_end_matches('/');
        if text.is_empty() {
            return Ok(None);
        }

        // A leading or internal slash anchors the rule to its declaring
        // directory; a bare name matches at any depth.
        let anchored = text.starts_with('/') || text.contains('/');
        let text = text.trim_start_matches('/');

        let mut segments = Vec::new();
        if !anchored {
            segments.push(Segment::Globstar);
        }
        for part in text.split('/') {
            if part == "**" {
                segments.push(Segment::Globstar);
            } else {
                let pattern =
                    Pattern::new(part).map_err(|e| PolylocError::InvalidPattern {
                        pattern: raw.clone(),
                        message: e.to_string(),
                    })?;
                segments.push(Segment::Glob(pattern));
            }
        }

        Ok(Some(IgnoreRule {
            raw,
            negated,
            dir_only,
            anchored,
            segments,
        }))
    }

    /// The rule text as it appeared in the ignore file.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether a match restores the path instead of excluding it.
    pub fn negated(&self) -> bool {
        self.negated
    }

    /// Whether this rule only applies to directory entries.
    pub fn dir_only(&self) -> bool {
        self.dir_only
    }

    /// Whether the rule is anchored to its declaring directory.
    pub fn anchored(&self) -> bool {
        self.anchored
    }

    /// Match against a path relative to the rule's declaring directory.
    ///
    /// Pure: the same rule and path always produce the same answer.
    pub fn matches(&self, relative: &Path) -> bool {
        let mut components = Vec::new();
        for comp in relative.components() {
            match comp.as_os_str().to_str() {
                Some(s) => components.push(s),
                // Non-UTF-8 components cannot match textual rules.
                None => return false,
            }
        }
        match_segments(&self.segments, &components)
    }
}

/// Recursive segment match; `Globstar` consumes zero or more components.
fn match_segments(segments: &[Segment], components: &[&str]) -> bool {
    match segments.split_first() {
        None => components.is_empty(),
        Some((Segment::Globstar, rest)) => {
            (0..=components.len()).any(|skip| match_segments(rest, &components[skip..]))
        }
        Some((Segment::Glob(pattern), rest)) => components
            .split_first()
            .is_some_and(|(first, tail)| pattern.matches(first) && match_segments(rest, tail)),
    }
}

/// Compile a sequence of rule lines, skipping blanks and comments.
///
/// Fails on the first malformed pattern; callers treat that as the whole
/// file contributing no rules.
pub fn compile_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<IgnoreRule>> {
    let mut rules = Vec::new();
    for line in lines {
        if let Some(rule) = IgnoreRule::parse(line)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}
