use crate::{Citation, CitationFormat, YearValue, normalize_year};

/// Fields collected from one `<PubmedArticle>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawPubmedArticle {
    /// First `<PMID>` of the article.
    pub(crate) pmid: Option<String>,
    /// Whether an `<Article>` element was seen.
    pub(crate) has_article: bool,
    pub(crate) title: String,
    /// `AbstractText` sections, already prefixed with their labels.
    pub(crate) abstract_parts: Vec<String>,
    pub(crate) authors: Vec<String>,
    pub(crate) journal: String,
    /// `PubDate/Year`.
    pub(crate) pub_year: Option<String>,
    /// `PubDate/MedlineDate`, used when there is no `Year`.
    pub(crate) medline_date: Option<String>,
    pub(crate) doi: Option<String>,
    pub(crate) mesh_terms: Vec<String>,
    pub(crate) keywords: Vec<String>,
    /// Line of the opening `<PubmedArticle>` tag (1-based).
    pub(crate) start_line: usize,
}

impl RawPubmedArticle {
    /// Convert into a [`Citation`], or `None` when the article lacks a PMID or an
    /// `<Article>` element.
    pub(crate) fn into_citation(self) -> Option<Citation> {
        let pmid = self.pmid.filter(|pmid| !pmid.is_empty())?;
        if !self.has_article {
            return None;
        }

        let year_text = self
            .pub_year
            .filter(|year| !year.is_empty())
            .or(self.medline_date);
        let year = year_text
            .map(YearValue::Text)
            .and_then(|value| normalize_year(Some(&value)))
            .map(YearValue::from);

        let citation = Citation::from_source(CitationFormat::PubMedXml).with_raw("pmid", pmid.clone());
        Some(Citation {
            id: format!("PMID:{pmid}"),
            title: self.title,
            abstract_text: self.abstract_parts.join(" ").trim().to_string(),
            year,
            authors: self.authors,
            journal: self.journal,
            doi: self.doi.unwrap_or_default(),
            mesh_terms: self.mesh_terms,
            keywords: self.keywords,
            ..citation
        })
    }
}
