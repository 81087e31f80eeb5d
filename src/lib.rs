//! Ingest, normalize and validate citation exports for systematic review screening.
//!
//! `bibscreen` reads the bibliographic exports that reference managers and literature
//! databases produce, converges them on one nine-field [`Citation`] record, and checks the
//! resulting batch for the metadata problems that make AI-assisted screening unreliable
//! (missing abstracts, missing titles, broken identifiers, impossible years).
//!
//! # Features
//!
//! - `csv` - CSV exports (enabled by default)
//! - `pubmed` - PubMed MEDLINE/NBIB text exports (enabled by default)
//! - `xml` - PubMed XML and EndNote XML exports (enabled by default)
//! - `ris` - RIS exports (enabled by default)
//! - `diagnostics` - render parse errors with source context
//!
//! A format whose feature is disabled is still *detected*; parsing it fails with
//! [`CitationError::MissingDependency`] rather than a malformed-input error, so callers
//! can tell "rebuild with the feature" apart from "bad file".
//!
//! # Supported Formats
//!
//! | Extension | Format |
//! |---|---|
//! | `.xml` | PubMed XML (`<PubmedArticle>`) or EndNote XML (`<record>`) |
//! | `.nbib`, `.txt` | MEDLINE/NBIB text |
//! | `.ris` | RIS |
//! | `.csv` | CSV with a header row |
//!
//! # Basic Usage
//!
//! ```rust
//! use bibscreen::{parse_citations, validate_citations};
//!
//! let export = b"TY  - JOUR
//! TI  - Example Article
//! AU  - Smith, John
//! PY  - 2021
//! ER  -
//! ";
//!
//! let citations = parse_citations(export, "export.ris").unwrap();
//! assert_eq!(citations[0].title, "Example Article");
//! assert_eq!(citations[0].year(), Some(2021));
//!
//! let (citations, report) = validate_citations(citations);
//! assert_eq!(report.summary.total, 1);
//! assert_eq!(report.summary.missing_abstract, 1);
//! # let _ = citations;
//! ```
//!
//! # Error Handling
//!
//! Structural problems are errors, data-quality problems are not:
//!
//! ```rust
//! use bibscreen::{parse_citations, CitationError, CitationFormat};
//!
//! let result = parse_citations(b"just some prose", "notes.txt");
//! assert!(matches!(
//!     result,
//!     Err(CitationError::UnsupportedFormat(CitationFormat::Unknown))
//! ));
//! ```
//!
//! # Thread Safety
//!
//! Parsing and validation are synchronous pure functions over an in-memory buffer.
//! Nothing is cached between calls, so they can be used from any number of threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg(feature = "csv")]
extern crate csv as csv_crate;

#[cfg(feature = "csv")]
pub mod csv;
pub mod detect;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
#[cfg(feature = "xml")]
pub mod endnote_xml;
pub mod error;
#[cfg(feature = "pubmed")]
pub mod pubmed;
#[cfg(feature = "xml")]
pub mod pubmed_xml;
#[cfg(feature = "ris")]
pub mod ris;
pub mod screening;
pub mod validate;
pub mod year;

// Reexports
#[cfg(feature = "csv")]
pub use csv::{CitationField, CsvConfig, CsvParser};
pub use detect::detect_format;
#[cfg(feature = "diagnostics")]
pub use diagnostics::parse_with_diagnostics;
#[cfg(feature = "xml")]
pub use endnote_xml::EndNoteXmlParser;
pub use error::{CitationError, ParseError, SourceSpan, ValueError};
#[cfg(feature = "pubmed")]
pub use pubmed::PubMedParser;
#[cfg(feature = "xml")]
pub use pubmed_xml::PubMedXmlParser;
#[cfg(feature = "ris")]
pub use ris::RisParser;
pub use validate::{ValidationIssue, ValidationReport, ValidationStats, validate_citations};
pub use year::{YearValue, normalize_year};

mod regex;
mod utils;

/// Citation export formats recognised by [`detect_format`].
///
/// `UnknownXml` and `Unknown` are detection outcomes, not parseable formats:
/// dispatching either of them fails with [`CitationError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationFormat {
    PubMedXml,
    PubMedText,
    Ris,
    EndNoteXml,
    Csv,
    UnknownXml,
    Unknown,
}

impl CitationFormat {
    /// The format tag, as recorded under `raw_data["source"]`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationFormat::PubMedXml => "pubmed_xml",
            CitationFormat::PubMedText => "pubmed_text",
            CitationFormat::Ris => "ris",
            CitationFormat::EndNoteXml => "endnote_xml",
            CitationFormat::Csv => "csv",
            CitationFormat::UnknownXml => "unknown_xml",
            CitationFormat::Unknown => "unknown",
        }
    }

    /// Human readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            CitationFormat::PubMedXml => "PubMed XML",
            CitationFormat::PubMedText => "MEDLINE",
            CitationFormat::Ris => "RIS",
            CitationFormat::EndNoteXml => "EndNote XML",
            CitationFormat::Csv => "CSV",
            CitationFormat::UnknownXml => "unknown XML",
            CitationFormat::Unknown => "unknown",
        }
    }

    /// The Cargo feature that compiles in the grammar for this format.
    ///
    /// Returns `None` for the two unknown variants, which have no grammar.
    pub fn required_feature(&self) -> Option<&'static str> {
        match self {
            CitationFormat::PubMedXml | CitationFormat::EndNoteXml => Some("xml"),
            CitationFormat::PubMedText => Some("pubmed"),
            CitationFormat::Ris => Some("ris"),
            CitationFormat::Csv => Some("csv"),
            CitationFormat::UnknownXml | CitationFormat::Unknown => None,
        }
    }

    /// Whether a parser for this format is compiled into this build.
    pub fn is_available(&self) -> bool {
        match self.required_feature() {
            Some("xml") => cfg!(feature = "xml"),
            Some("pubmed") => cfg!(feature = "pubmed"),
            Some("ris") => cfg!(feature = "ris"),
            Some("csv") => cfg!(feature = "csv"),
            _ => false,
        }
    }
}

impl std::fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The canonical citation record every parser converges on.
///
/// All nine fields are always present. Absent values are empty strings, empty
/// lists or `None`, never missing keys, and that holds for the serialized form too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    /// Identifier, unique within a corpus once validated. May be empty before validation.
    pub id: String,
    /// Title of the work
    pub title: String,
    /// Abstract text
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Publication year as found in the source.
    ///
    /// Parsers only emit [`YearValue::Int`]. Records from other collaborators may carry
    /// anything; after [`validate_citations`] this is `None` or an in-range integer.
    pub year: Option<YearValue>,
    /// Display-formatted author names in source order
    pub authors: Vec<String>,
    /// Journal name
    pub journal: String,
    /// Digital Object Identifier
    pub doi: String,
    /// MeSH Terms
    pub mesh_terms: Vec<String>,
    /// Keywords
    pub keywords: Vec<String>,
    /// Provenance bag. Carried through untouched; `source` holds the format tag.
    pub raw_data: serde_json::Map<String, serde_json::Value>,
}

impl Citation {
    /// Create a new empty Citation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty Citation whose provenance records the given source format.
    pub fn from_source(format: CitationFormat) -> Self {
        let mut citation = Self::default();
        citation.raw_data.insert(
            "source".to_string(),
            serde_json::Value::from(format.as_str()),
        );
        citation
    }

    /// The year as an integer, if it holds one.
    pub fn year(&self) -> Option<i32> {
        match self.year {
            Some(YearValue::Int(year)) => i32::try_from(year).ok(),
            _ => None,
        }
    }

    /// Record a provenance value under `raw_data`.
    pub(crate) fn with_raw(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.raw_data.insert(key.to_string(), value.into());
        self
    }

    /// Whether the entry carries neither an id nor a title and should be dropped as noise.
    pub(crate) fn is_noise(&self) -> bool {
        self.id.trim().is_empty() && self.title.trim().is_empty()
    }
}

/// Trait for implementing citation parsers.
pub trait CitationParser {
    /// Parse a string containing one or more citations.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` only if the input cannot be tokenized at all. Field-level
    /// anomalies degrade to empty values instead.
    fn parse(&self, input: &str) -> std::result::Result<Vec<Citation>, ParseError>;
}

/// Knobs for [`parse_citations_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Configuration handed to the CSV parser.
    #[cfg(feature = "csv")]
    pub csv: CsvConfig,
}

/// Detect the format of a citation export and parse it.
///
/// # Arguments
///
/// * `raw` - The complete file contents
/// * `filename` - The original file name, used for extension-based detection
///
/// # Errors
///
/// - [`CitationError::UnsupportedFormat`] if the format cannot be classified
/// - [`CitationError::MissingDependency`] if the format's grammar is compiled out
/// - [`CitationError::Parse`] if the input is structurally malformed
///
/// # Examples
///
/// ```
/// use bibscreen::parse_citations;
///
/// let nbib = b"PMID- 12345678
/// TI  - Example Title
/// FAU - Smith, John
/// DP  - 2020 Jun 9
/// ";
///
/// let citations = parse_citations(nbib, "pubmed.nbib").unwrap();
/// assert_eq!(citations[0].id, "PMID:12345678");
/// assert_eq!(citations[0].title, "Example Title");
/// ```
pub fn parse_citations(raw: &[u8], filename: &str) -> Result<Vec<Citation>, CitationError> {
    parse_citations_with(raw, filename, &ParseOptions::default())
}

/// [`parse_citations`] with explicit [`ParseOptions`].
#[instrument(skip(raw, options), fields(len = raw.len()))]
pub fn parse_citations_with(
    raw: &[u8],
    filename: &str,
    options: &ParseOptions,
) -> Result<Vec<Citation>, CitationError> {
    let format = detect_format(filename, raw);
    debug!(format = format.as_str(), "Detected citation format");

    if matches!(format, CitationFormat::Unknown | CitationFormat::UnknownXml) {
        return Err(CitationError::UnsupportedFormat(format));
    }
    if !format.is_available() {
        return Err(CitationError::missing_dependency(format));
    }

    // Every parser gets the whole buffer from the start.
    let input = String::from_utf8_lossy(raw);
    let citations = match format {
        CitationFormat::PubMedXml => dispatch::pubmed_xml(&input)?,
        CitationFormat::PubMedText => dispatch::pubmed_text(&input)?,
        CitationFormat::Ris => dispatch::ris(&input)?,
        CitationFormat::EndNoteXml => dispatch::endnote_xml(&input)?,
        CitationFormat::Csv => dispatch::csv(&input, options)?,
        CitationFormat::UnknownXml | CitationFormat::Unknown => {
            return Err(CitationError::UnsupportedFormat(format));
        }
    };

    info!(format = format.as_str(), count = citations.len(), "Parsed citations");
    Ok(citations)
}

/// One function per format, each compiled against its parser or against the
/// missing-dependency error when the feature is off.
mod dispatch {
    use crate::{Citation, CitationError, ParseOptions};
    #[allow(unused_imports)]
    use crate::{CitationFormat, CitationParser};

    type Parsed = Result<Vec<Citation>, CitationError>;

    #[cfg(feature = "xml")]
    pub(super) fn pubmed_xml(input: &str) -> Parsed {
        Ok(crate::PubMedXmlParser::new().parse(input)?)
    }

    #[cfg(not(feature = "xml"))]
    pub(super) fn pubmed_xml(_input: &str) -> Parsed {
        Err(CitationError::missing_dependency(CitationFormat::PubMedXml))
    }

    #[cfg(feature = "xml")]
    pub(super) fn endnote_xml(input: &str) -> Parsed {
        Ok(crate::EndNoteXmlParser::new().parse(input)?)
    }

    #[cfg(not(feature = "xml"))]
    pub(super) fn endnote_xml(_input: &str) -> Parsed {
        Err(CitationError::missing_dependency(CitationFormat::EndNoteXml))
    }

    #[cfg(feature = "pubmed")]
    pub(super) fn pubmed_text(input: &str) -> Parsed {
        Ok(crate::PubMedParser::new().parse(input)?)
    }

    #[cfg(not(feature = "pubmed"))]
    pub(super) fn pubmed_text(_input: &str) -> Parsed {
        Err(CitationError::missing_dependency(CitationFormat::PubMedText))
    }

    #[cfg(feature = "ris")]
    pub(super) fn ris(input: &str) -> Parsed {
        Ok(crate::RisParser::new().parse(input)?)
    }

    #[cfg(not(feature = "ris"))]
    pub(super) fn ris(_input: &str) -> Parsed {
        Err(CitationError::missing_dependency(CitationFormat::Ris))
    }

    #[cfg(feature = "csv")]
    pub(super) fn csv(input: &str, options: &ParseOptions) -> Parsed {
        Ok(crate::CsvParser::with_config(options.csv.clone()).parse(input)?)
    }

    #[cfg(not(feature = "csv"))]
    pub(super) fn csv(_input: &str, _options: &ParseOptions) -> Parsed {
        Err(CitationError::missing_dependency(CitationFormat::Csv))
    }
}
