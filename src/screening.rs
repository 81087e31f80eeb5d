//! Wire contract with the external screening model.
//!
//! The model itself is out of reach of this crate. What lives here is the shape of what
//! goes in ([`ScreeningCriteria`] and the task text from
//! [`ScreeningCriteria::task_prompt`]) and what comes back ([`ScreeningDecision`]).
//!
//! # Example
//!
//! ```
//! use bibscreen::screening::{Confidence, Decision, parse_screening_results};
//!
//! let reply = r#"[{
//!   "id": "PMID:1",
//!   "picott": {
//!     "population": "adults with type 2 diabetes",
//!     "intervention": "metformin",
//!     "comparison": "Not found",
//!     "outcome": "HbA1c",
//!     "timeframe": "12 weeks",
//!     "studyType": "randomized controlled trial"
//!   },
//!   "inclusionCriteria": ["RCT: \"randomized controlled trial\""],
//!   "exclusionCriteria": [],
//!   "reasoning": "Matches every element.",
//!   "decision": "Include",
//!   "confidence": "high"
//! }]"#;
//!
//! let decisions = parse_screening_results(reply).unwrap();
//! assert_eq!(decisions[0].decision, Decision::Include);
//! assert_eq!(decisions[0].confidence, Confidence::High);
//! ```

use serde::{Deserialize, Serialize};

const NOT_SPECIFIED: &str = "Not specified";

/// Screening criteria for one review, in the PICOTT framework plus free-text lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningCriteria {
    pub population: Option<String>,
    pub intervention: Option<String>,
    pub comparator: Option<String>,
    pub outcome: Option<String>,
    pub timeframe: Option<String>,
    #[serde(alias = "studyType")]
    pub study_type: Option<String>,
    pub inclusion_criteria: Vec<String>,
    pub exclusion_criteria: Vec<String>,
    /// Number of citations in the searchable corpus.
    pub corpus_size: usize,
    /// Search mode the model must use with the corpus search tool.
    pub search_mode: SearchMode,
}

/// How the corpus search tool matches queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Fulltext,
    Semantic,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Fulltext => "fulltext",
            SearchMode::Semantic => "semantic",
        }
    }
}

impl ScreeningCriteria {
    /// Render the task text handed to the screening model.
    pub fn task_prompt(&self) -> String {
        let mut task = format!(
            "You are conducting a systematic review screening of {corpus} research citations.\n\
             The citations are available through the MCP search and fetch tools.\n\
             \n\
             IMPORTANT: Use search mode=\"{mode}\" for all search operations.\n\
             \n\
             Your task is to screen each citation based on the following criteria:\n\
             \n\
             ## PICOTT Criteria (ALL must match for inclusion):\n\
             - Population: {population}\n\
             - Intervention: {intervention}\n\
             - Comparator: {comparator}\n\
             - Outcome: {outcome}\n\
             - Timeframe: {timeframe}\n\
             - Study Type: {study_type}\n\
             \n\
             ## Additional Inclusion Criteria:\n\
             {inclusion}\n\
             \n\
             ## Exclusion Criteria:\n\
             {exclusion}\n\
             \n",
            corpus = self.corpus_size,
            mode = self.search_mode.as_str(),
            population = or_not_specified(&self.population),
            intervention = or_not_specified(&self.intervention),
            comparator = or_not_specified(&self.comparator),
            outcome = or_not_specified(&self.outcome),
            timeframe = or_not_specified(&self.timeframe),
            study_type = or_not_specified(&self.study_type),
            inclusion = bullet_list(&self.inclusion_criteria),
            exclusion = bullet_list(&self.exclusion_criteria),
        );
        task.push_str(INSTRUCTIONS);
        task
    }
}

const INSTRUCTIONS: &str = r#"## Instructions:
1. Search the corpus systematically to identify all potentially relevant citations
2. Extract PICOTT elements with EXACT QUOTES from the title/abstract
3. A citation must meet ALL PICOTT criteria AND inclusion criteria to be included
4. If ANY exclusion criterion is met, the citation should be excluded
5. When uncertain, err on the side of inclusion for full-text review

Return your results as a JSON array where each citation has this structure:
[
  {
    "id": "citation_id",
    "title": "citation title",
    "picott": {
      "population": "exact quote from abstract identifying population or 'Not found'",
      "intervention": "exact quote from abstract identifying intervention or 'Not found'",
      "comparison": "exact quote from abstract identifying comparison or 'Not found'",
      "outcome": "exact quote from abstract identifying outcome or 'Not found'",
      "timeframe": "exact quote from abstract identifying timeframe or 'Not found'",
      "studyType": "exact quote from abstract identifying study type or 'Not found'"
    },
    "inclusionCriteria": ["list of matched inclusion criteria with supporting quotes"],
    "exclusionCriteria": ["list of matched exclusion criteria with supporting quotes"],
    "reasoning": "Step-by-step reasoning for your decision",
    "decision": "Include" or "Exclude",
    "confidence": "high/medium/low"
  }
]

Focus on extracting EXACT quotes that support each PICOTT element and criterion match."#;

fn or_not_specified(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NOT_SPECIFIED)
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quotes extracted for each PICOTT element; `"Not found"` when the model found none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PicottQuotes {
    pub population: String,
    pub intervention: String,
    pub comparison: String,
    pub outcome: String,
    pub timeframe: String,
    #[serde(rename = "studyType")]
    pub study_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// The model's verdict on one citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningDecision {
    /// Citation id as stored in the corpus.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub picott: PicottQuotes,
    /// Matched inclusion criteria with supporting quotes.
    #[serde(rename = "inclusionCriteria", default)]
    pub inclusion_criteria: Vec<String>,
    /// Matched exclusion criteria with supporting quotes.
    #[serde(rename = "exclusionCriteria", default)]
    pub exclusion_criteria: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    pub decision: Decision,
    pub confidence: Confidence,
}

/// Parse the model's reply: a JSON array of decisions, optionally inside a
/// ```` ```json ```` fence.
///
/// # Errors
///
/// Returns the `serde_json` error when the reply is not a decision array.
pub fn parse_screening_results(reply: &str) -> Result<Vec<ScreeningDecision>, serde_json::Error> {
    serde_json::from_str(strip_code_fence(reply))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let body = body.split_once('\n').map_or("", |(_, rest)| rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_task_prompt_fills_criteria() {
        let criteria = ScreeningCriteria {
            population: Some("Adults with hypertension".to_string()),
            intervention: Some("Salt reduction".to_string()),
            study_type: Some("RCT".to_string()),
            inclusion_criteria: vec!["English language".to_string(), "Peer reviewed".to_string()],
            exclusion_criteria: vec!["Animal studies".to_string()],
            corpus_size: 120,
            ..Default::default()
        };

        let prompt = criteria.task_prompt();
        assert!(prompt.starts_with("You are conducting a systematic review screening of 120 research citations."));
        assert!(prompt.contains("search mode=\"fulltext\""));
        assert!(prompt.contains("- Population: Adults with hypertension\n"));
        assert!(prompt.contains("- Comparator: Not specified\n"));
        assert!(prompt.contains("- Study Type: RCT\n"));
        assert!(prompt.contains("## Additional Inclusion Criteria:\n- English language\n- Peer reviewed\n"));
        assert!(prompt.contains("## Exclusion Criteria:\n- Animal studies\n"));
        assert!(prompt.contains("\"studyType\""));
        assert!(prompt.ends_with("criterion match."));
    }

    #[test]
    fn test_criteria_accept_camel_case_study_type() {
        let criteria: ScreeningCriteria =
            serde_json::from_str(r#"{"studyType": "Cohort", "search_mode": "semantic"}"#).unwrap();
        assert_eq!(criteria.study_type.as_deref(), Some("Cohort"));
        assert_eq!(criteria.search_mode, SearchMode::Semantic);
        assert_eq!(criteria.corpus_size, 0);
    }

    #[rstest]
    #[case("[]")]
    #[case("  []  ")]
    #[case("```json\n[]\n```")]
    #[case("```\n[]\n```\n")]
    fn test_strip_code_fence(#[case] reply: &str) {
        assert_eq!(strip_code_fence(reply), "[]");
    }

    #[test]
    fn test_decision_round_trip() {
        let decision = ScreeningDecision {
            id: "EndNote_3".to_string(),
            title: None,
            picott: PicottQuotes {
                population: "children aged 5-12".to_string(),
                study_type: "Not found".to_string(),
                ..Default::default()
            },
            inclusion_criteria: vec![],
            exclusion_criteria: vec!["Case report: \"we report a case\"".to_string()],
            reasoning: "Single case report.".to_string(),
            decision: Decision::Exclude,
            confidence: Confidence::Medium,
        };

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "Exclude");
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["picott"]["studyType"], "Not found");
        assert_eq!(json["exclusionCriteria"][0], "Case report: \"we report a case\"");
        assert!(json.get("title").is_none());

        let back: ScreeningDecision = serde_json::from_value(json).unwrap();
        assert_eq!(back, decision);
    }

    #[test]
    fn test_unknown_decision_is_error() {
        let reply = r#"[{"id": "1", "decision": "Maybe", "confidence": "high"}]"#;
        assert!(parse_screening_results(reply).is_err());
    }
}
