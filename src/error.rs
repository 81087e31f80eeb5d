//! Error types for citation parsing operations.
//!
//! Three failure kinds reach callers: the input could not be classified
//! ([`CitationError::UnsupportedFormat`]), the grammar for the detected format is not
//! compiled in ([`CitationError::MissingDependency`]), or the input was classified but is
//! structurally broken ([`CitationError::Parse`]). Field-level anomalies are never errors.

use crate::CitationFormat;
use thiserror::Error;

/// Half-open byte range `start..end` into the parsed text.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Everything [`parse_citations`](crate::parse_citations) can fail with.
#[derive(Error, Debug)]
pub enum CitationError {
    /// Detection could not classify the input. Retrying needs a different file.
    #[error("Unsupported file format: {}", .0.as_str())]
    UnsupportedFormat(CitationFormat),

    /// The grammar for a detected format is not compiled into this build.
    #[error("{format} files need the `{feature}` feature of bibscreen")]
    MissingDependency {
        format: CitationFormat,
        feature: &'static str,
    },

    /// The input was classified but could not be tokenized.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl CitationError {
    /// Build the missing-dependency error for `format`.
    pub fn missing_dependency(format: CitationFormat) -> Self {
        CitationError::MissingDependency {
            format,
            feature: format.required_feature().unwrap_or("none"),
        }
    }

    /// Whether retrying with the same bytes could ever succeed (after a rebuild).
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, CitationError::MissingDependency { .. })
    }
}

/// Parse error with location and context information.
#[derive(Error, Debug)]
#[error("Error in {format} format{}: {error}",
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        (None, Some(c)) => format!(" at column {}", c),
        (None, None) => String::new(),
    }
)]
pub struct ParseError {
    /// 1-based line of the offending input, when known.
    pub line: Option<usize>,
    /// 1-based column, when known.
    pub column: Option<usize>,
    /// Offending bytes, when the parser can point at them.
    pub span: Option<SourceSpan>,
    /// Format whose grammar rejected the input.
    pub format: CitationFormat,
    pub error: ValueError,
}

impl ParseError {
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        format: CitationFormat,
        error: ValueError,
    ) -> Self {
        Self {
            line,
            column,
            span: None,
            format,
            error,
        }
    }

    /// Attach the offending byte range.
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Error at a known line, column unknown.
    pub fn at_line(line: usize, format: CitationFormat, error: ValueError) -> Self {
        Self::new(Some(line), None, format, error)
    }

    /// Error that cannot be tied to a position, such as a bad configuration.
    pub fn without_position(format: CitationFormat, error: ValueError) -> Self {
        Self::new(None, None, format, error)
    }

    /// Shorthand for a syntax error at a known line.
    pub(crate) fn syntax_at(line: usize, format: CitationFormat, message: String) -> Self {
        Self::at_line(line, format, ValueError::Syntax(message))
    }
}

/// What went wrong inside a [`ParseError`].
#[derive(Error, Debug)]
pub enum ValueError {
    /// The grammar rejected the input.
    #[error("Bad syntax: {0}")]
    Syntax(String),

    /// The parser was configured with settings it cannot honour.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|position| position.line() as usize);
        let span = err.position().map(|position| {
            let byte = position.byte() as usize;
            SourceSpan::new(byte, byte)
        });

        let mut parse_err = ParseError::new(
            line,
            None,
            CitationFormat::Csv,
            ValueError::Syntax(err.to_string()),
        );
        parse_err.span = span;
        parse_err
    }
}
