//! Summary table and JSON rendering.
//!
//! The renderer only sees the per-language mapping; rows are sorted by
//! file count (descending, name as tie-break) as a presentation step after
//! the pipeline has drained.

use console::Style;
use polyloclib::{LanguageSummary, ScanReport};
use serde::Serialize;

const RULE: &str =
    "────────────────────────────────────────────────────────────";
const NAME_WIDTH: usize = 24;
const CELL_WIDTH: usize = 12;

/// One rendered row, also the JSON row shape.
#[derive(Debug, Serialize)]
struct Row {
    name: String,
    files: u64,
    lines: u64,
    bytes: u64,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    languages: Vec<Row>,
    total: Row,
}

impl Row {
    fn from_summary(summary: &LanguageSummary) -> Self {
        Row {
            name: summary.name.clone(),
            files: summary.count,
            lines: summary.lines,
            bytes: summary.bytes,
        }
    }
}

/// Sort summaries for display: most files first, then by name.
fn sorted_rows(report: &ScanReport) -> (Vec<Row>, Row) {
    let mut rows: Vec<Row> = report.languages.values().map(Row::from_summary).collect();
    rows.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.name.cmp(&b.name)));

    let total = Row {
        name: "Total".to_string(),
        files: rows.iter().map(|r| r.files).sum(),
        lines: rows.iter().map(|r| r.lines).sum(),
        bytes: rows.iter().map(|r| r.bytes).sum(),
    };
    (rows, total)
}

fn format_row(row: &Row) -> String {
    format!(
        "{:<name$}{:>cell$}{:>cell$}{:>cell$}",
        row.name,
        row.files,
        row.lines,
        row.bytes,
        name = NAME_WIDTH,
        cell = CELL_WIDTH,
    )
}

/// Render the fixed-width summary table.
pub fn render_table(report: &ScanReport) -> String {
    let (rows, total) = sorted_rows(report);
    let heading_style = Style::new().bold();
    let heading = format!(
        "{:<name$}{:>cell$}{:>cell$}{:>cell$}",
        "Language",
        "Files",
        "Lines",
        "Bytes",
        name = NAME_WIDTH,
        cell = CELL_WIDTH,
    );

    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&heading_style.apply_to(heading).to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format_row(&total));
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Render the summary as JSON.
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    let (languages, total) = sorted_rows(report);
    serde_json::to_string_pretty(&JsonReport { languages, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyloclib::FileSummary;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn report() -> ScanReport {
        let mut languages = HashMap::new();
        let mut python = LanguageSummary::new("Python");
        python.add_file(FileSummary {
            path: PathBuf::from("a.py"),
            language: "Python".into(),
            extension: "py".into(),
            bytes: 120,
            lines: 10,
        });
        python.add_file(FileSummary {
            path: PathBuf::from("b.py"),
            language: "Python".into(),
            extension: "py".into(),
            bytes: 80,
            lines: 6,
        });
        let mut go = LanguageSummary::new("Go");
        go.add_file(FileSummary {
            path: PathBuf::from("main.go"),
            language: "Go".into(),
            extension: "go".into(),
            bytes: 200,
            lines: 20,
        });
        languages.insert("Python".to_string(), python);
        languages.insert("Go".to_string(), go);
        ScanReport { languages }
    }

    #[test]
    fn test_rows_sorted_by_file_count() {
        let (rows, total) = sorted_rows(&report());
        assert_eq!(rows[0].name, "Python");
        assert_eq!(rows[1].name, "Go");
        assert_eq!(total.files, 3);
        assert_eq!(total.lines, 36);
        assert_eq!(total.bytes, 400);
    }

    #[test]
    fn test_table_contains_all_languages_and_total() {
        let table = render_table(&report());
        assert!(table.contains("Python"));
        assert!(table.contains("Go"));
        assert!(table.contains("Total"));
        assert!(table.contains("Language"));
    }

    #[test]
    fn test_json_is_valid_and_totalled() {
        let json = render_json(&report()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["languages"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["total"]["files"], 3);
        assert_eq!(parsed["total"]["lines"], 36);
    }

    #[test]
    fn test_empty_report_renders_zero_total() {
        let empty = ScanReport::default();
        let table = render_table(&empty);
        assert!(table.contains("Total"));

        let json = render_json(&empty).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["total"]["files"], 0);
    }
}
