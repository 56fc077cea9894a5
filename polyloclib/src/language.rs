//! Language identification from file names and shebang lines.
//!
//! The database is a static JSON table embedded at compile time and
//! deserialized once. Each language lists the extensions, full file names,
//! and shebang interpreters it claims. Lookup never guesses: a name that
//! maps to more than one candidate language is reported ambiguous and the
//! file is skipped by the pipeline.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;

/// Sentinel candidate meaning "decide from the shebang line".
pub const SHEBANG: &str = "#!";

const LANGUAGES_JSON: &str = include_str!("../data/languages.json");

#[derive(Debug, Deserialize)]
struct LanguageSpec {
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    filenames: Vec<String>,
    #[serde(default)]
    shebangs: Vec<String>,
}

/// Inverted lookup tables built from the embedded database.
#[derive(Debug, Default)]
pub struct LanguageDb {
    by_extension: HashMap<String, Vec<String>>,
    by_filename: HashMap<String, Vec<String>>,
    by_shebang: HashMap<String, String>,
}

static DB: LazyLock<LanguageDb> = LazyLock::new(|| {
    let specs: HashMap<String, LanguageSpec> =
        serde_json::from_str(LANGUAGES_JSON).expect("embedded language database is valid JSON");

    let mut db = LanguageDb::default();
    for (name, spec) in specs {
        for ext in spec.extensions {
            db.by_extension.entry(ext).or_default().push(name.clone());
        }
        for fname in spec.filenames {
            db.by_filename.entry(fname).or_default().push(name.clone());
        }
        for shebang in spec.shebangs {
            db.by_shebang.insert(shebang, name.clone());
        }
    }
    // Deterministic candidate order regardless of map iteration
    for candidates in db.by_extension.values_mut() {
        candidates.sort();
    }
    for candidates in db.by_filename.values_mut() {
        candidates.sort();
    }
    db
});

fn db() -> &'static LanguageDb {
    &DB
}

/// Candidate languages for a file name, plus the lookup key used.
///
/// Extensionless and dot-prefixed names try the full-filename table and
/// fall back to the [`SHEBANG`] sentinel; otherwise the full name is tried
/// first, then extension suffixes longest-first so compound extensions
/// like `d.ts` win over `ts`.
pub fn candidates_for_name(name: &str) -> (Vec<&'static str>, String) {
    let db = db();

    if !name.contains('.') || name.starts_with('.') {
        if let Some(langs) = db.by_filename.get(name) {
            return (langs.iter().map(String::as_str).collect(), name.to_string());
        }
        return (vec![SHEBANG], name.to_string());
    }

    if let Some(langs) = db.by_filename.get(name) {
        return (langs.iter().map(String::as_str).collect(), name.to_string());
    }

    let mut rest = name;
    while let Some((_, suffix)) = rest.split_once('.') {
        if let Some(langs) = db.by_extension.get(suffix) {
            return (
                langs.iter().map(String::as_str).collect(),
                suffix.to_string(),
            );
        }
        rest = suffix;
    }

    (Vec::new(), rest.to_string())
}

/// Resolve the candidate set to one language, or `None` when the file is
/// unclassifiable (no candidates, unresolvable shebang, or an ambiguity
/// this layer refuses to guess at).
pub fn detect(candidates: &[&'static str], content: &str) -> Option<&'static str> {
    match candidates {
        [single] if *single == SHEBANG => detect_from_shebang(content),
        [single] => Some(single),
        // TODO: content-based disambiguation for multi-language extensions
        _ => None,
    }
}

/// Map the first content line's interpreter to a language.
fn detect_from_shebang(content: &str) -> Option<&'static str> {
    let line = content.lines().next()?.trim();
    let rest = line.strip_prefix("#!")?;

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let interpreter = match tokens.as_slice() {
        [] => return None,
        // `#!/usr/bin/env python` names the interpreter last
        [_, .., last] => *last,
        [only] => only.rsplit('/').next()?,
    };

    db().by_shebang.get(interpreter).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        let (candidates, ext) = candidates_for_name("main.rs");
        assert_eq!(candidates, vec!["Rust"]);
        assert_eq!(ext, "rs");
    }

    #[test]
    fn test_compound_extension_wins_over_suffix() {
        let (candidates, ext) = candidates_for_name("api.d.ts");
        assert_eq!(candidates, vec!["TypeScript Declaration"]);
        assert_eq!(ext, "d.ts");

        let (candidates, ext) = candidates_for_name("api.ts");
        assert_eq!(candidates, vec!["TypeScript"]);
        assert_eq!(ext, "ts");
    }

    #[test]
    fn test_full_filename_lookup() {
        let (candidates, key) = candidates_for_name("Makefile");
        assert_eq!(candidates, vec!["Makefile"]);
        assert_eq!(key, "Makefile");

        let (candidates, _) = candidates_for_name("CMakeLists.txt");
        assert_eq!(candidates, vec!["CMake"]);
    }

    #[test]
    fn test_extensionless_name_falls_back_to_shebang_sentinel() {
        let (candidates, _) = candidates_for_name("install");
        assert_eq!(candidates, vec![SHEBANG]);
    }

    #[test]
    fn test_dotfile_gets_shebang_sentinel() {
        let (candidates, _) = candidates_for_name(".bashrc");
        assert_eq!(candidates, vec![SHEBANG]);
    }

    #[test]
    fn test_unknown_extension_has_no_candidates() {
        let (candidates, ext) = candidates_for_name("blob.xyzzy");
        assert!(candidates.is_empty());
        assert_eq!(ext, "xyzzy");
    }

    #[test]
    fn test_ambiguous_extension_reports_multiple_candidates() {
        let (candidates, _) = candidates_for_name("matrix.m");
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains(&"MATLAB"));
        assert!(candidates.contains(&"Objective-C"));
    }

    #[test]
    fn test_detect_single_candidate() {
        assert_eq!(detect(&["Rust"], "fn main() {}\n"), Some("Rust"));
    }

    #[test]
    fn test_detect_refuses_to_guess_ambiguity() {
        assert_eq!(detect(&["MATLAB", "Objective-C"], "x = 1\n"), None);
        assert_eq!(detect(&[], "anything\n"), None);
    }

    #[test]
    fn test_detect_from_shebang_env_form() {
        assert_eq!(detect(&[SHEBANG], "#!/usr/bin/env python3\nprint()\n"), Some("Python"));
    }

    #[test]
    fn test_detect_from_shebang_direct_form() {
        assert_eq!(detect(&[SHEBANG], "#!/bin/sh\necho hi\n"), Some("Shell"));
    }

    #[test]
    fn test_detect_without_shebang_line() {
        assert_eq!(detect(&[SHEBANG], "just text\n"), None);
        assert_eq!(detect(&[SHEBANG], ""), None);
    }
}
