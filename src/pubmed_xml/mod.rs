//! PubMed XML format parser implementation.
//!
//! Parses the `<PubmedArticleSet>` documents returned by PubMed's "XML" export and by
//! the E-utilities `efetch` endpoint.
//!
//! # Example
//!
//! ```
//! use bibscreen::{CitationParser, PubMedXmlParser};
//!
//! let xml = r#"<?xml version="1.0"?>
//! <PubmedArticleSet>
//!   <PubmedArticle>
//!     <MedlineCitation>
//!       <PMID>12345678</PMID>
//!       <Article>
//!         <Journal><Title>Journal of Examples</Title></Journal>
//!         <ArticleTitle>Example Title</ArticleTitle>
//!         <AuthorList>
//!           <Author><LastName>Smith</LastName><ForeName>John</ForeName></Author>
//!         </AuthorList>
//!       </Article>
//!     </MedlineCitation>
//!   </PubmedArticle>
//! </PubmedArticleSet>"#;
//!
//! let citations = PubMedXmlParser::new().parse(xml).unwrap();
//! assert_eq!(citations[0].id, "PMID:12345678");
//! assert_eq!(citations[0].authors, vec!["Smith John"]);
//! assert_eq!(citations[0].journal, "Journal of Examples");
//! ```

mod parse;
mod structure;

use crate::error::ParseError;
use crate::{Citation, CitationParser};
use parse::parse_pubmed_xml;

/// Parser for PubMed XML citations.
#[derive(Debug, Clone, Default)]
pub struct PubMedXmlParser;

impl PubMedXmlParser {
    /// Creates a new PubMed XML parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for PubMedXmlParser {
    /// Parse PubMed XML content into citations.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the document is not well-formed XML.
    fn parse(&self, input: &str) -> Result<Vec<Citation>, ParseError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_pubmed_xml(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(PubMedXmlParser::new().parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_multiple_articles_keep_order() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle><MedlineCitation><PMID>1</PMID><Article><ArticleTitle>First</ArticleTitle></Article></MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><PMID>2</PMID><Article><ArticleTitle>Second</ArticleTitle></Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let citations = PubMedXmlParser::new().parse(xml).unwrap();
        let titles: Vec<_> = citations.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
    }
}
