//! RIS format data structures.
//!
//! This module defines intermediate data structures used during RIS parsing.
//!
//! # Field Processing Strategy
//! - **First-wins**: title, abstract, year, id and DOI use the first non-empty value,
//!   falling back to the alternative tag (`T1`, `N2`, `Y1`) only when the primary is absent
//! - **Priority-based**: the journal name is picked by tag priority
//! - **Fallback list**: authors come from `AU`, or from `A1` when there are no `AU` lines

use crate::ris::tags::RisTag;
use crate::{Citation, CitationFormat, YearValue, normalize_year};
use std::collections::HashMap;

/// Structured raw data for one RIS reference.
#[derive(Debug, Clone)]
pub(crate) struct RawRisData {
    /// Tag-value data, duplicates kept in source order.
    pub(crate) data: HashMap<RisTag, Vec<String>>,
    /// Line of the `TY` tag that opened the reference (1-based).
    pub(crate) start_line: usize,
    /// Tag of the most recent value, for continuation lines.
    last_tag: Option<RisTag>,
}

impl RawRisData {
    /// Create a new empty RawRisData.
    pub(crate) fn new(start_line: usize) -> Self {
        Self {
            data: HashMap::new(),
            start_line,
            last_tag: None,
        }
    }

    /// Add a tag-value pair to the data.
    pub(crate) fn add_data(&mut self, tag: RisTag, value: String) {
        self.last_tag = Some(tag.clone());
        self.data.entry(tag).or_default().push(value);
    }

    /// Append a wrapped line to the most recent value.
    pub(crate) fn continue_last(&mut self, text: &str) {
        if let Some(last) = self
            .last_tag
            .as_ref()
            .and_then(|tag| self.data.get_mut(tag))
            .and_then(|values| values.last_mut())
        {
            if !last.is_empty() {
                last.push(' ');
            }
            last.push_str(text);
        }
    }

    /// Get the first value for a tag, if it exists.
    #[cfg(test)]
    pub(crate) fn get_first(&self, tag: &RisTag) -> Option<&String> {
        self.data.get(tag).and_then(|values| values.first())
    }

    /// First non-empty value among `tags`, tried in order.
    fn first_non_empty(&self, tags: &[RisTag]) -> Option<String> {
        tags.iter()
            .filter_map(|tag| self.data.get(tag))
            .flat_map(|values| values.iter())
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .map(String::from)
    }

    fn values(&self, tag: &RisTag) -> Vec<String> {
        self.data
            .get(tag)
            .map(|values| {
                values
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Generic helper method to select the best value based on tag priority.
    ///
    /// # Arguments
    /// * `priority_fn` - A function that extracts the priority from a RisTag, returning None if the tag is not relevant
    fn get_best_value_by_priority<F>(&self, priority_fn: F) -> Option<String>
    where
        F: Fn(&RisTag) -> Option<u8>,
    {
        let mut best_value = None;
        let mut best_priority = u8::MAX;

        for (tag, values) in &self.data {
            if let Some(priority) = priority_fn(tag)
                && priority < best_priority
                && let Some(first_value) = values.first()
                && !first_value.trim().is_empty()
            {
                best_priority = priority;
                best_value = Some(first_value.trim().to_string());
            }
        }

        best_value
    }

    /// Get the best journal name based on tag priority.
    pub(crate) fn get_best_journal(&self) -> Option<String> {
        self.get_best_value_by_priority(RisTag::journal_priority)
    }

    /// The whole reference as a tag map, for provenance.
    fn entry_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.data
            .iter()
            .map(|(tag, values)| (tag.as_tag().to_string(), serde_json::Value::from(values.clone())))
            .collect()
    }

    /// Convert into a [`Citation`]. `ordinal` is the zero-based position of the reference
    /// and names it when it has neither an `ID` nor a `DO` value.
    pub(crate) fn into_citation(self, ordinal: usize) -> Citation {
        let id = self
            .first_non_empty(&[RisTag::ReferenceId])
            .or_else(|| self.first_non_empty(&[RisTag::Doi]))
            .unwrap_or_else(|| format!("RIS_{ordinal}"));

        let year = self
            .first_non_empty(&[RisTag::PublicationYear, RisTag::DatePrimary])
            .map(YearValue::Text)
            .and_then(|year| normalize_year(Some(&year)))
            .map(YearValue::from);

        let mut authors = self.values(&RisTag::Author);
        if authors.is_empty() {
            authors = self.values(&RisTag::AuthorPrimary);
        }

        let citation =
            Citation::from_source(CitationFormat::Ris).with_raw("entry", self.entry_map());

        Citation {
            id,
            title: self
                .first_non_empty(&[RisTag::Title, RisTag::TitleAlternative])
                .unwrap_or_default(),
            abstract_text: self
                .first_non_empty(&[RisTag::Abstract, RisTag::AbstractAlternative])
                .unwrap_or_default(),
            year,
            authors,
            journal: self.get_best_journal().unwrap_or_default(),
            doi: self.first_non_empty(&[RisTag::Doi]).unwrap_or_default(),
            mesh_terms: Vec::new(),
            keywords: self.values(&RisTag::Keywords),
            ..citation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> RawRisData {
        let mut raw = RawRisData::new(1);
        for (tag, value) in pairs {
            raw.add_data(RisTag::from_tag(tag), value.to_string());
        }
        raw
    }

    #[test]
    fn test_id_fallbacks() {
        let with_id = raw(&[("ID", "ref-1"), ("DO", "10.1/x")]).into_citation(0);
        assert_eq!(with_id.id, "ref-1");

        let with_doi = raw(&[("DO", "10.1/x")]).into_citation(0);
        assert_eq!(with_doi.id, "10.1/x");
        assert_eq!(with_doi.doi, "10.1/x");

        let bare = raw(&[("TI", "Title")]).into_citation(3);
        assert_eq!(bare.id, "RIS_3");
    }

    #[test]
    fn test_alternative_tags() {
        let citation = raw(&[
            ("T1", "Alt title"),
            ("N2", "Alt abstract"),
            ("Y1", "1998///"),
            ("A1", "Baranwal, Arun K"),
        ])
        .into_citation(0);
        assert_eq!(citation.title, "Alt title");
        assert_eq!(citation.abstract_text, "Alt abstract");
        assert_eq!(citation.year, Some(YearValue::Int(1998)));
        assert_eq!(citation.authors, vec!["Baranwal, Arun K"]);
    }

    #[test]
    fn test_primary_tags_win() {
        let citation = raw(&[
            ("T1", "Alt title"),
            ("TI", "Primary title"),
            ("AU", "Smith, J"),
            ("A1", "Other, O"),
            ("PY", "2020"),
            ("Y1", "1999"),
        ])
        .into_citation(0);
        assert_eq!(citation.title, "Primary title");
        assert_eq!(citation.authors, vec!["Smith, J"]);
        assert_eq!(citation.year(), Some(2020));
    }

    #[test]
    fn test_journal_priority() {
        let citation = raw(&[("JO", "Alternative"), ("JF", "Full Journal")]).into_citation(0);
        assert_eq!(citation.journal, "Full Journal");
    }

    #[test]
    fn test_entry_provenance() {
        let citation = raw(&[("TY", "JOUR"), ("VL", "10")]).into_citation(0);
        assert_eq!(citation.raw_data["source"], "ris");
        assert_eq!(citation.raw_data["entry"]["TY"], serde_json::json!(["JOUR"]));
        assert_eq!(citation.raw_data["entry"]["VL"], serde_json::json!(["10"]));
    }

    #[test]
    fn test_continue_last() {
        let mut data = RawRisData::new(1);
        data.continue_last("orphan");
        assert!(data.data.is_empty());
        data.add_data(RisTag::Title, "A long".to_string());
        data.continue_last("title");
        assert_eq!(data.get_first(&RisTag::Title).map(String::as_str), Some("A long title"));
    }
}
