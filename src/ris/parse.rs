//! Line tokenizer for RIS exports.
//!
//! A reference opens at a `TY` line and closes at `ER`. Inside a reference, a line that
//! does not start with a tag continues the value of the previous tag. Outside a
//! reference, untagged lines (export banners, metadata) are skipped; a tagged line other
//! than `TY` or `ER` is malformed input.

use crate::CitationFormat;
use crate::error::{ParseError, SourceSpan};
use crate::ris::structure::RawRisData;
use crate::ris::tags::RisTag;
use tracing::debug;

/// Parse the content of a RIS formatted file, returning structured data.
pub(crate) fn ris_parse<S: AsRef<str>>(ris_text: S) -> Result<Vec<RawRisData>, ParseError> {
    let text = ris_text.as_ref();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut references = Vec::new();
    let mut current: Option<RawRisData> = None;
    let mut offset = 0;

    for (index, chunk) in text.split_inclusive('\n').enumerate() {
        let line_number = index + 1;
        let line_start = offset;
        offset += chunk.len();
        let raw_line = chunk.trim_end_matches(['\r', '\n']);
        let line = raw_line.trim();

        if line.is_empty() || is_metadata_line(line) {
            continue;
        }

        let Some((tag, content)) = parse_ris_line(raw_line) else {
            match current.as_mut() {
                Some(reference) => reference.continue_last(line),
                None => debug!(line = line_number, "Skipping untagged line outside a RIS reference"),
            }
            continue;
        };

        match tag {
            RisTag::Type => {
                if let Some(open) = current.take() {
                    debug!(line = open.start_line, "RIS reference closed by TY without ER");
                    references.push(open);
                }
                let mut reference = RawRisData::new(line_number);
                reference.add_data(RisTag::Type, content);
                current = Some(reference);
            }
            RisTag::EndOfReference => match current.take() {
                Some(reference) => references.push(reference),
                None => debug!(line = line_number, "Stray ER outside a RIS reference"),
            },
            tag => {
                let Some(reference) = current.as_mut() else {
                    return Err(outside_reference(line_number, line_start, raw_line));
                };
                // One author per AU/A1 line, corporate names included.
                reference.add_data(tag, content);
            }
        }
    }

    // A final reference without ER is still a reference.
    if let Some(reference) = current {
        references.push(reference);
    }

    Ok(references)
}

fn outside_reference(line_number: usize, line_start: usize, raw_line: &str) -> ParseError {
    ParseError::syntax_at(
        line_number,
        CitationFormat::Ris,
        format!("Expected `TY  - ` to open a reference, found '{}'", raw_line.trim()),
    )
    .with_span(SourceSpan::new(line_start, line_start + raw_line.len()))
}

/// Parse a single RIS line into a tag and content.
///
/// A tag is an uppercase letter followed by an uppercase letter or digit, then the
/// separator. Returns `None` for lines that are not tagged.
fn parse_ris_line(line: &str) -> Option<(RisTag, String)> {
    let line = line.trim_end();
    let bytes = line.as_bytes();
    if bytes.len() < 3
        || !bytes[0].is_ascii_uppercase()
        || !(bytes[1].is_ascii_uppercase() || bytes[1].is_ascii_digit())
    {
        return None;
    }

    let content = extract_ris_content(&line[2..])?;
    Some((RisTag::from_tag(&line[..2]), content))
}

/// Extract content after the tag, handling the separator variants seen in exports:
/// `"  - value"`, `"  -"`, `" - value"` and `"- value"`.
fn extract_ris_content(rest: &str) -> Option<String> {
    let after_dash = rest.trim_start_matches(' ').strip_prefix('-')?;
    if after_dash.is_empty() {
        return Some(String::new());
    }
    after_dash
        .strip_prefix(' ')
        .map(|content| content.trim().to_string())
}

/// Check if a line is RIS metadata that should be ignored.
fn is_metadata_line(line: &str) -> bool {
    line.starts_with("Record #")
        || line.starts_with("Provider:")
        || line.starts_with("Content:")
        || line.starts_with("Database:")
}
