//! Citation validation and repair.
//!
//! [`validate_citations`] checks every citation of a batch for the metadata problems
//! that make screening unreliable, repairs what can be repaired (missing ids,
//! impossible years) and returns the repaired batch with a [`ValidationReport`].
//! Quality problems are reported, never returned as errors.
//!
//! Each call starts from fresh counters, so reports of separate calls never mix.
//!
//! # Example
//!
//! ```
//! use bibscreen::{Citation, YearValue, validate_citations};
//!
//! let mut citation = Citation::new();
//! citation.title = "Cancer Treatment Study".to_string();
//! citation.year = Some(YearValue::from("Invalid"));
//!
//! let (citations, report) = validate_citations(vec![citation]);
//! assert!(citations[0].id.starts_with("hash_"));
//! assert_eq!(citations[0].year, None);
//! assert_eq!(report.summary.invalid_year, 1);
//! ```

mod report;

pub use report::{
    CriticalIssues, MISSING_ABSTRACT_WARNING_PCT, PROBLEMATIC_SAMPLE, ValidationIssue,
    ValidationReport, ValidationStats,
};

use crate::utils::{is_blank_or_nan, truncate_chars};
use crate::year::{MAX_YEAR, MIN_YEAR};
use crate::{Citation, YearValue};
use md5::{Digest, Md5};
use tracing::{debug, info, instrument, warn};

/// Shortest title, in characters, that counts as present.
pub const MIN_TITLE_CHARS: usize = 5;

/// Shortest abstract, in characters, that counts as present.
pub const MIN_ABSTRACT_CHARS: usize = 50;

const MISSING_ID: &str = "Missing or invalid ID";
const SHORT_TITLE: &str = "Missing or too short title";
const SHORT_ABSTRACT: &str = "Missing or insufficient abstract";

/// Validate and repair a batch of citations.
///
/// Per citation, in order:
/// 1. A blank or `nan` id is replaced by the DOI, else by `hash_` plus the first
///    12 hex digits of the title's MD5, else by `unknown_<n>` where `n` is the
///    citation's 1-based position in the batch.
/// 2. Titles shorter than [`MIN_TITLE_CHARS`] are flagged.
/// 3. Abstracts shorter than [`MIN_ABSTRACT_CHARS`] are flagged.
/// 4. A present year is coerced to an integer; values outside 1900..=2100 or that do
///    not coerce are flagged and removed.
///
/// After validation every `year` is `None` or an in-range [`YearValue::Int`].
#[instrument(skip(citations), fields(count = citations.len()))]
pub fn validate_citations(citations: Vec<Citation>) -> (Vec<Citation>, ValidationReport) {
    let mut stats = ValidationStats {
        total: citations.len(),
        ..Default::default()
    };
    let mut problems = Vec::new();

    let validated: Vec<Citation> = citations
        .into_iter()
        .enumerate()
        .map(|(index, mut citation)| {
            let issues = validate_one(&mut citation, index + 1, &mut stats);
            if !issues.is_empty() {
                problems.push(ValidationIssue {
                    citation_id: citation.id.clone(),
                    title: truncate_chars(&citation.title, 50).to_string(),
                    issues,
                });
            }
            citation
        })
        .collect();

    if stats.missing_abstract > 0 {
        debug!(
            missing = stats.missing_abstract,
            "Abstract enrichment is not configured; abstracts left as found"
        );
    }

    let report = ValidationReport::generate(stats, problems);
    info!(
        total = report.summary.total,
        valid = report.summary.valid,
        missing_abstract = report.summary.missing_abstract,
        missing_title = report.summary.missing_title,
        invalid_year = report.summary.invalid_year,
        invalid_id = report.summary.invalid_id,
        quality_score = report.quality_score,
        "Validated citations"
    );
    if report.has_high_missing_abstracts() {
        warn!(
            pct = report.critical_issues.missing_abstracts_pct,
            "High share of citations without abstracts"
        );
    }

    (validated, report)
}

/// Run every check on one citation. Checks never short-circuit each other.
fn validate_one(citation: &mut Citation, position: usize, stats: &mut ValidationStats) -> Vec<String> {
    let mut issues = Vec::new();

    if is_blank_or_nan(&citation.id) {
        issues.push(MISSING_ID.to_string());
        stats.invalid_id += 1;
        citation.id = synthesize_id(citation, position);
    }

    let title_ok = is_long_enough(&citation.title, MIN_TITLE_CHARS);
    if !title_ok {
        issues.push(SHORT_TITLE.to_string());
        stats.missing_title += 1;
    }

    let abstract_ok = is_long_enough(&citation.abstract_text, MIN_ABSTRACT_CHARS);
    if !abstract_ok {
        issues.push(SHORT_ABSTRACT.to_string());
        stats.missing_abstract += 1;
    }

    if let Some(year) = citation.year.take() {
        match check_year(&year) {
            YearCheck::Valid(year) => citation.year = Some(YearValue::Int(year)),
            YearCheck::Absent => {}
            YearCheck::OutOfRange => {
                issues.push(format!("Invalid year: {year}"));
                stats.invalid_year += 1;
            }
            YearCheck::Unparseable => {
                issues.push(format!("Invalid year format: {year}"));
                stats.invalid_year += 1;
            }
        }
    }

    if title_ok && abstract_ok {
        stats.valid += 1;
    }

    issues
}

fn is_long_enough(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() >= min_chars
}

/// A stable id for a citation that arrived without one.
fn synthesize_id(citation: &Citation, position: usize) -> String {
    if !is_blank_or_nan(&citation.doi) {
        return citation.doi.trim().to_string();
    }
    if !citation.title.trim().is_empty() {
        return title_hash_id(&citation.title);
    }
    format!("unknown_{position}")
}

/// `hash_` plus the first 12 hex digits of the MD5 of the title as given.
fn title_hash_id(title: &str) -> String {
    let digest = hex::encode(Md5::digest(title.as_bytes()));
    format!("hash_{}", &digest[..12])
}

#[derive(Debug, PartialEq)]
enum YearCheck {
    Valid(i64),
    /// Empty text, treated as no year at all.
    Absent,
    OutOfRange,
    Unparseable,
}

/// Integer coercion of a year: floats truncate, text must be an integer literal
/// once trimmed.
fn check_year(year: &YearValue) -> YearCheck {
    let value = match year {
        YearValue::Int(value) => *value,
        YearValue::Float(value) if value.is_finite() => value.trunc() as i64,
        YearValue::Float(_) => return YearCheck::Unparseable,
        YearValue::Text(text) if text.is_empty() => return YearCheck::Absent,
        YearValue::Text(text) => match text.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => return YearCheck::Unparseable,
        },
    };

    if (MIN_YEAR..=MAX_YEAR).contains(&value) {
        YearCheck::Valid(value)
    } else {
        YearCheck::OutOfRange
    }
}
