//! Source-annotated rendering of parse failures using [ariadne].
//!
//! Only compiled with the `diagnostics` feature:
//!
//! ```toml
//! [dependencies]
//! bibscreen = { version = "0.1", features = ["diagnostics"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bibscreen::parse_with_diagnostics;
//!
//! let export = b"AU  - Smith, John\nER  -\n";
//! match parse_with_diagnostics(export, "refs.ris") {
//!     Ok(citations) => println!("Parsed {} citations", citations.len()),
//!     Err(report) => eprintln!("{report}"),
//! }
//! ```

use crate::error::ParseError;
use crate::{Citation, CitationError, parse_citations};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;

impl ParseError {
    /// Render this error as an Ariadne report pointing into `source`.
    ///
    /// The returned `String` contains ANSI colour codes. If the report cannot be
    /// written, the plain [`Display`](std::fmt::Display) text is returned instead.
    ///
    /// # Arguments
    ///
    /// * `filename` - Label shown in the report header (e.g. `"citations.ris"`).
    /// * `source` - The text that was parsed.
    pub fn to_diagnostic(&self, filename: &str, source: &str) -> String {
        let range = self.primary_byte_range(source);

        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(self.error.to_string())
                    .with_color(Color::Red),
            )
            .finish();

        let mut buf = Vec::new();
        match report.write((filename, Source::from(source)), &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{filename}: {self}"),
        }
    }

    /// Byte range in `source` that best locates the error: the explicit span, then the
    /// reported line, then the start of the file. Always clamped to `source`.
    fn primary_byte_range(&self, source: &str) -> Range<usize> {
        let clamp = |offset: usize| offset.min(source.len());

        if let Some(span) = &self.span {
            let start = clamp(span.start);
            return start..clamp(span.end).max(start);
        }

        if let Some(line) = self.line {
            let mut offset = 0;
            for (index, text) in source.split_inclusive('\n').enumerate() {
                if index + 1 == line {
                    let content = text.trim_end_matches(['\n', '\r']);
                    return offset..offset + content.len();
                }
                offset += text.len();
            }
            return clamp(offset)..clamp(offset);
        }

        0..0
    }
}

/// [`parse_citations`], with malformed-input errors rendered against the source text.
///
/// Unsupported-format and missing-dependency errors carry no position and are returned
/// as their plain message.
pub fn parse_with_diagnostics(raw: &[u8], filename: &str) -> Result<Vec<Citation>, String> {
    parse_citations(raw, filename).map_err(|err| match err {
        CitationError::Parse(parse_err) => {
            parse_err.to_diagnostic(filename, &String::from_utf8_lossy(raw))
        }
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CitationFormat;
    use crate::error::{SourceSpan, ValueError};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "TY  - JOUR\nTI  - Hello\r\nER  -\n";

    #[test]
    fn test_range_from_span() {
        let err = ParseError::syntax_at(1, CitationFormat::Ris, "oops".to_string())
            .with_span(SourceSpan::new(0, 10));
        assert_eq!(err.primary_byte_range(SOURCE), 0..10);
        assert!(err.to_diagnostic("test.ris", SOURCE).contains("test.ris"));
    }

    #[test]
    fn test_range_from_line_excludes_line_ending() {
        let err = ParseError::syntax_at(2, CitationFormat::Ris, "oops".to_string());
        assert_eq!(err.primary_byte_range(SOURCE), 11..22);
    }

    #[test]
    fn test_range_is_clamped() {
        let err = ParseError::syntax_at(9, CitationFormat::Ris, "late".to_string())
            .with_span(SourceSpan::new(100, 120));
        assert_eq!(err.primary_byte_range("short"), 5..5);

        let err = ParseError::syntax_at(9, CitationFormat::Ris, "late".to_string());
        assert_eq!(err.primary_byte_range("short"), 5..5);
    }

    #[test]
    fn test_no_position() {
        let err = ParseError::without_position(
            CitationFormat::Csv,
            ValueError::Config("bad delimiter".to_string()),
        );
        assert_eq!(err.primary_byte_range(SOURCE), 0..0);
        assert!(err.to_diagnostic("sheet.csv", SOURCE).contains("sheet.csv"));
    }

    #[cfg(feature = "ris")]
    #[test]
    fn test_parse_with_diagnostics_renders_malformed_input() {
        let report = parse_with_diagnostics(b"TY  - JOUR\nER  -\nAU  - Smith, John\n", "refs.ris")
            .unwrap_err();
        assert!(report.contains("refs.ris"));
        assert!(report.contains("TY  - "));
    }

    #[test]
    fn test_parse_with_diagnostics_unsupported() {
        let report = parse_with_diagnostics(b"plain prose", "notes.txt").unwrap_err();
        assert_eq!(report, "Unsupported file format: unknown");
    }
}
