use crate::{Citation, CitationFormat, YearValue};

/// Fields extracted from one MEDLINE entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawPubmedData {
    /// PubMed identifier digits, when the entry has a `PMID-` line.
    pub(crate) pmid: Option<String>,
    pub(crate) title: String,
    pub(crate) abstract_text: String,
    pub(crate) authors: Vec<String>,
    pub(crate) journal: String,
    pub(crate) doi: String,
    pub(crate) year: Option<i64>,
    pub(crate) mesh_terms: Vec<String>,
    /// Starting line number of this entry in the source text (1-based).
    pub(crate) start_line: usize,
}

impl RawPubmedData {
    /// An entry with neither a PMID nor a title cannot be told apart from noise.
    pub(crate) fn is_noise(&self) -> bool {
        self.pmid.is_none() && self.title.trim().is_empty()
    }
}

impl From<RawPubmedData> for Citation {
    fn from(
        RawPubmedData {
            pmid,
            title,
            abstract_text,
            authors,
            journal,
            doi,
            year,
            mesh_terms,
            start_line: _,
        }: RawPubmedData,
    ) -> Self {
        let mut citation = Citation::from_source(CitationFormat::PubMedText);
        if let Some(pmid) = pmid {
            citation.id = format!("PMID:{pmid}");
            citation = citation.with_raw("pmid", pmid);
        }
        Self {
            title,
            abstract_text,
            year: year.map(YearValue::Int),
            authors,
            journal,
            doi,
            mesh_terms,
            ..citation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_into_citation() {
        let raw = RawPubmedData {
            pmid: Some("123".to_string()),
            title: "A title".to_string(),
            year: Some(2020),
            ..Default::default()
        };
        let citation: Citation = raw.into();
        assert_eq!(citation.id, "PMID:123");
        assert_eq!(citation.year, Some(YearValue::Int(2020)));
        assert_eq!(citation.raw_data["source"], "pubmed_text");
        assert_eq!(citation.raw_data["pmid"], "123");
    }

    #[test]
    fn test_without_pmid_id_is_empty() {
        let raw = RawPubmedData {
            title: "Untracked".to_string(),
            ..Default::default()
        };
        let citation: Citation = raw.into();
        assert_eq!(citation.id, "");
        assert!(!citation.raw_data.contains_key("pmid"));
    }

    #[test]
    fn test_is_noise() {
        assert!(RawPubmedData::default().is_noise());
        let titled = RawPubmedData {
            title: "x".to_string(),
            ..Default::default()
        };
        assert!(!titled.is_noise());
    }
}
