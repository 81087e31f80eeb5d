//! RIS format parser implementation.
//!
//! RIS uses two-character tags at the start of each line. Each reference runs from
//! `TY` to `ER`; every tag is kept in the citation's provenance under
//! `raw_data["entry"]`, and the tags with a canonical counterpart fill the nine fields.
//!
//! # Example
//!
//! ```
//! use bibscreen::{CitationParser, RisParser};
//!
//! let input = r#"TY  - JOUR
//! TI  - Example Title
//! AU  - Smith, John
//! ER  -"#;
//!
//! let parser = RisParser::new();
//!
//! let citations = parser.parse(input).unwrap();
//! assert_eq!(citations[0].title, "Example Title");
//! assert_eq!(citations[0].id, "RIS_0");
//! ```

mod parse;
mod structure;
mod tags;

use crate::{Citation, CitationParser};
use parse::ris_parse;

/// Parser for RIS format citations.
///
/// The id is the reference's `ID` value, else its `DO` value, else `RIS_<n>` where `n`
/// is the zero-based position of the reference in the file.
#[derive(Debug, Clone, Default)]
pub struct RisParser;

impl RisParser {
    /// Creates a new RIS parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibscreen::RisParser;
    /// let parser = RisParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for RisParser {
    /// Parses a string containing one or more citations in RIS format.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if a tagged line appears outside a `TY`..`ER` reference.
    fn parse(&self, input: &str) -> std::result::Result<Vec<Citation>, crate::error::ParseError> {
        let citations = ris_parse(input)?
            .into_iter()
            .enumerate()
            .map(|(ordinal, raw)| raw.into_citation(ordinal))
            .collect();

        Ok(citations)
    }
}
