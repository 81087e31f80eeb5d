//! EndNote XML format parser implementation.
//!
//! EndNote XML is the export format of the EndNote reference manager. Values are
//! usually wrapped in `<style>` elements; their text is read through the markup.
//!
//! # Example
//!
//! ```
//! use bibscreen::{CitationParser, EndNoteXmlParser};
//!
//! let export = r#"
//! <?xml version="1.0" encoding="UTF-8"?>
//! <xml>
//!   <records>
//!     <record>
//!       <rec-number>42</rec-number>
//!       <ref-type name="Journal Article">17</ref-type>
//!       <contributors>
//!         <authors>
//!           <author>Okafor, Chidi</author>
//!           <author>Lindqvist, Maja</author>
//!         </authors>
//!       </contributors>
//!       <titles>
//!         <title>Salt reduction and blood pressure in older adults</title>
//!         <secondary-title>Hypertension Research</secondary-title>
//!       </titles>
//!       <dates><year>2023</year></dates>
//!       <electronic-resource-num>10.1038/hr.2023.17</electronic-resource-num>
//!     </record>
//!   </records>
//! </xml>
//! "#;
//!
//! let parser = EndNoteXmlParser::new();
//! let citations = parser.parse(export).unwrap();
//! assert_eq!(citations.len(), 1);
//!
//! let citation = &citations[0];
//! assert_eq!(citation.id, "EndNote_42");
//! assert_eq!(citation.title, "Salt reduction and blood pressure in older adults");
//! assert_eq!(citation.journal, "Hypertension Research");
//! assert_eq!(citation.authors, vec!["Okafor, Chidi", "Lindqvist, Maja"]);
//! assert_eq!(citation.year(), Some(2023));
//! ```

mod parse;

use crate::error::ParseError;
use crate::{Citation, CitationParser};
use parse::parse_endnote_xml;

/// Parser for EndNote XML format citations.
///
/// Every `<record>` becomes a citation. Its id is `EndNote_<rec-number>`, or
/// `EndNote_<n>` (zero-based position) when the record has no number.
#[derive(Debug, Clone, Default)]
pub struct EndNoteXmlParser;

impl EndNoteXmlParser {
    /// Creates a new EndNote XML parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibscreen::EndNoteXmlParser;
    /// let parser = EndNoteXmlParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for EndNoteXmlParser {
    /// Parse EndNote XML content into citations.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the document is not well-formed XML.
    fn parse(&self, input: &str) -> Result<Vec<Citation>, ParseError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        parse_endnote_xml(input)
    }
}
