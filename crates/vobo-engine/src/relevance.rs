use std::sync::LazyLock;

use regex::Regex;
use vobo_core::{norm_text, normalize_name, Finding};

static SHEET_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhoja\s*(\d+)\b").expect("sheet token regex"));

/// Findings a free-text question is about.
///
/// A "Hoja N" token selects the N-th sheet (1-based, workbook order); a
/// sheet name or a normalized attribute name appearing in the query selects
/// findings on it. With no match the first finding is returned so the
/// caller always has something to talk about.
pub fn pick_relevant<'a>(findings: &'a [Finding], sheet_names: &[String], query: &str) -> Vec<&'a Finding> {
    let q = norm_text(query);
    let tokens: Vec<String> = q
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']'))
        .map(normalize_name)
        .filter(|t| !t.is_empty())
        .collect();

    let mut sheets: Vec<&str> = SHEET_TOKEN_RE
        .captures_iter(&q)
        .filter_map(|c| c[1].parse::<usize>().ok())
        .filter_map(|n| n.checked_sub(1).and_then(|i| sheet_names.get(i)))
        .map(String::as_str)
        .collect();
    sheets.extend(
        sheet_names
            .iter()
            .filter(|name| {
                let n = norm_text(name);
                !n.is_empty() && q.contains(n.as_str())
            })
            .map(String::as_str),
    );

    let matched: Vec<&Finding> = findings
        .iter()
        .filter(|f| {
            let attribute = normalize_name(&f.attribute);
            sheets.contains(&f.sheet.as_str()) || (!attribute.is_empty() && tokens.contains(&attribute))
        })
        .collect();

    if matched.is_empty() {
        findings.first().into_iter().collect()
    } else {
        matched
    }
}
