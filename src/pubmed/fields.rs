//! Field extraction rules for MEDLINE entries.
//!
//! MEDLINE exports in the wild are messy, so each field is pulled out of the whole entry
//! text by its own anchored pattern. A rule that finds nothing returns an empty value.

use crate::regex::Regex;
use crate::utils::collapse_lines;
use std::sync::LazyLock;

static PMID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^PMID-\s*(\d+)").unwrap());

static LID_DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^LID\s*-\s*(10\.\S+)\s*\[doi\]").unwrap());

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| wrapped_field("TI"));

static ABSTRACT_REGEX: LazyLock<Regex> = LazyLock::new(|| wrapped_field("AB"));

static FULL_AUTHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| single_line_field("FAU"));

static JOURNAL_REGEX: LazyLock<Regex> = LazyLock::new(|| single_line_field("TA"));

static DATE_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^DP\s*-\s*(\d{4})").unwrap());

static MESH_REGEX: LazyLock<Regex> = LazyLock::new(|| single_line_field("MH"));

/// A field whose value may wrap onto indented continuation lines. The value runs up to
/// the next tagged line or the end of the entry. An empty first line stays empty.
fn wrapped_field(tag: &str) -> Regex {
    Regex::new(&format!(
        r"(?ms)^{tag}\s*-[ \t]*(.*?)(?:\n[A-Z][A-Z0-9]{{1,3}}\s*-|\z)"
    ))
    .unwrap()
}

/// A repeatable field whose value is the rest of its line.
fn single_line_field(tag: &str) -> Regex {
    Regex::new(&format!(r"(?m)^{tag}\s*-[ \t]*([^\n]+)")).unwrap()
}

fn all_values(regex: &Regex, entry: &str) -> Vec<String> {
    regex
        .captures_iter(entry)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Digits of the first `PMID-` line.
pub(crate) fn pmid(entry: &str) -> Option<String> {
    PMID_REGEX.captures(entry).map(|caps| caps[1].to_string())
}

/// DOI from the first `LID - 10.x [doi]` line.
pub(crate) fn doi(entry: &str) -> String {
    LID_DOI_REGEX
        .captures(entry)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

pub(crate) fn title(entry: &str) -> String {
    TITLE_REGEX
        .captures(entry)
        .map(|caps| collapse_lines(&caps[1]))
        .unwrap_or_default()
}

pub(crate) fn abstract_text(entry: &str) -> String {
    ABSTRACT_REGEX
        .captures(entry)
        .map(|caps| collapse_lines(&caps[1]))
        .unwrap_or_default()
}

/// Every `FAU` value in order. Abbreviated `AU` names are not used.
pub(crate) fn authors(entry: &str) -> Vec<String> {
    all_values(&FULL_AUTHOR_REGEX, entry)
}

/// Journal title abbreviation.
pub(crate) fn journal(entry: &str) -> String {
    JOURNAL_REGEX
        .captures(entry)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// The four digits leading the `DP` date.
pub(crate) fn year(entry: &str) -> Option<i64> {
    DATE_YEAR_REGEX
        .captures(entry)
        .and_then(|caps| caps[1].parse().ok())
}

pub(crate) fn mesh_terms(entry: &str) -> Vec<String> {
    all_values(&MESH_REGEX, entry)
}
