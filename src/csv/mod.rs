//! CSV format parser implementation.
//!
//! Reads a header row plus data rows. Headers are matched against a fixed,
//! case-sensitive alias table (see [`CsvConfig`]); columns that match no canonical
//! field are kept in the citation's provenance under `raw_data["extra"]`.
//!
//! # Example
//!
//! ```
//! use bibscreen::{CitationParser, CsvParser};
//!
//! let input = "PMID,Title,Year,Authors\nPMID:1,Example Paper,2023,\"Smith J; Doe A\"";
//!
//! let parser = CsvParser::new();
//!
//! let citations = parser.parse(input).unwrap();
//! assert_eq!(citations[0].id, "PMID:1");
//! assert_eq!(citations[0].title, "Example Paper");
//! assert_eq!(citations[0].authors, vec!["Smith J", "Doe A"]);
//! ```

mod config;
mod parse;
mod structure;

use crate::{Citation, CitationParser};
pub use config::{CitationField, CsvConfig};
use parse::csv_parse;
use tracing::debug;

/// Parser for CSV-formatted citation data with configurable mappings.
///
/// # Examples
///
/// With custom configuration:
/// ```
/// use bibscreen::{CitationParser, CsvConfig, CsvParser};
///
/// let mut config = CsvConfig::new();
/// config.set_delimiter(b';').add_header_alias("Article Name", "title");
///
/// let parser = CsvParser::with_config(config);
/// let citations = parser.parse("Article Name;Year\nA Paper;2020").unwrap();
/// assert_eq!(citations[0].title, "A Paper");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    config: CsvConfig,
}

impl CsvParser {
    /// Creates a new CSV parser with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CSV parser with custom configuration
    #[must_use]
    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Gets a reference to the current configuration
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Gets a mutable reference to the current configuration
    pub fn config_mut(&mut self) -> &mut CsvConfig {
        &mut self.config
    }
}

impl CitationParser for CsvParser {
    /// Parses a string containing CSV formatted citation data.
    ///
    /// Rows with neither an id nor a title are dropped.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the configuration is invalid, when the csv reader fails,
    /// or when a row is longer than the header and the configuration is not flexible.
    fn parse(&self, input: &str) -> std::result::Result<Vec<Citation>, crate::error::ParseError> {
        let raw_citations = csv_parse(input, &self.config)?;

        let mut citations = Vec::with_capacity(raw_citations.len());
        for raw in raw_citations {
            let line = raw.line_number;
            let citation = raw.into_citation();
            if citation.is_noise() {
                debug!(line, "Dropping CSV row without id or title");
                continue;
            }
            citations.push(citation);
        }

        Ok(citations)
    }
}
