//! MEDLINE/NBIB text parser.
//!
//! Parses the tagged text format PubMed exports as `.nbib` (and often `.txt`).
//! Entries start at every `PMID-` line.
//!
//! # Example
//!
//! ```
//! use bibscreen::{CitationParser, PubMedParser};
//!
//! let input = r#"PMID- 12345678
//! TI  - Example Title
//! FAU - Smith, John
//!
//! "#;
//!
//! let parser = PubMedParser::new();
//!
//! let citations = parser.parse(input).unwrap();
//! assert_eq!(citations[0].title, "Example Title");
//! assert_eq!(citations[0].authors, vec!["Smith, John"]);
//! ```

mod fields;
mod parse;
mod split;
mod structure;

use crate::error::ParseError;
use crate::pubmed::parse::pubmed_parse;
use crate::{Citation, CitationParser};

/// Parser for MEDLINE formatted citations.
///
/// Each field is extracted by its own pattern over the whole entry text, so a damaged
/// field never spoils its neighbours. Entries with neither a PMID nor a title are dropped.
#[derive(Debug, Clone, Default)]
pub struct PubMedParser {}

impl PubMedParser {
    /// Creates a new MEDLINE parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibscreen::PubMedParser;
    /// let parser = PubMedParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CitationParser for PubMedParser {
    /// Parses a string containing one or more citations in MEDLINE format.
    ///
    /// MEDLINE text has no structure that can fail to tokenize, so this never returns
    /// an error.
    fn parse(&self, input: &str) -> Result<Vec<Citation>, ParseError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(pubmed_parse(input).into_iter().map(Citation::from).collect())
    }
}
