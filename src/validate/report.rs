//! The data-quality report returned alongside validated citations.

use serde::Serialize;

/// Share of missing abstracts, in percent, above which the report recommends a
/// different export.
pub const MISSING_ABSTRACT_WARNING_PCT: f64 = 20.0;

/// Number of problematic citations listed in a report.
pub const PROBLEMATIC_SAMPLE: usize = 10;

/// Counters accumulated over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub total: usize,
    /// Title of at least 5 and abstract of at least 50 characters.
    pub valid: usize,
    pub missing_abstract: usize,
    pub missing_title: usize,
    pub invalid_year: usize,
    /// Citations whose id had to be generated.
    pub invalid_id: usize,
    /// Citations repaired by abstract enrichment. Always zero until an enrichment
    /// source exists.
    pub enhanced: usize,
}

/// One citation that raised at least one issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// The id after repair.
    pub citation_id: String,
    /// First 50 characters of the title.
    pub title: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalIssues {
    pub missing_abstracts: usize,
    pub missing_abstracts_pct: f64,
}

/// Summary of a validation run.
///
/// Serializes to the JSON shape handed to UI and API collaborators:
///
/// ```json
/// {
///   "summary": { "total": 2, "valid": 1, ... },
///   "quality_score": 50.0,
///   "critical_issues": { "missing_abstracts": 1, "missing_abstracts_pct": 50.0 },
///   "recommendations": ["..."],
///   "problematic_citations": [{ "citation_id": "...", "title": "...", "issues": ["..."] }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub summary: ValidationStats,
    /// Percentage of valid citations, 0 for an empty batch.
    pub quality_score: f64,
    pub critical_issues: CriticalIssues,
    pub recommendations: Vec<String>,
    /// The first [`PROBLEMATIC_SAMPLE`] citations with issues, in batch order.
    pub problematic_citations: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub(crate) fn generate(stats: ValidationStats, mut issues: Vec<ValidationIssue>) -> Self {
        let quality_score = percent(stats.valid, stats.total);
        let missing_abstracts_pct = percent(stats.missing_abstract, stats.total);

        let mut recommendations = Vec::new();
        if missing_abstracts_pct > MISSING_ABSTRACT_WARNING_PCT {
            recommendations.push(
                "⚠️ A high percentage of citations are missing abstracts. Consider using a \
                 different export format or retrieving abstracts from an external service."
                    .to_string(),
            );
        }
        if stats.invalid_id > 0 {
            recommendations.push(format!(
                "Generated IDs for {} citations with missing/invalid identifiers.",
                stats.invalid_id
            ));
        }

        issues.truncate(PROBLEMATIC_SAMPLE);

        Self {
            critical_issues: CriticalIssues {
                missing_abstracts: stats.missing_abstract,
                missing_abstracts_pct,
            },
            summary: stats,
            quality_score,
            recommendations,
            problematic_citations: issues,
        }
    }

    /// Whether more than [`MISSING_ABSTRACT_WARNING_PCT`] percent of abstracts are missing.
    pub fn has_high_missing_abstracts(&self) -> bool {
        self.critical_issues.missing_abstracts_pct > MISSING_ABSTRACT_WARNING_PCT
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
