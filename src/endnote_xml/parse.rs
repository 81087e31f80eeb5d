//! Event-driven reader for EndNote `<record>` elements.

use crate::error::{ParseError, SourceSpan};
use crate::utils::line_number_at;
use crate::{Citation, CitationFormat, YearValue, normalize_year};
use quick_xml::Reader;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::io::BufRead;

/// Read the text of the element whose start tag was just consumed, up to its closing tag.
///
/// Text inside nested markup (EndNote wraps most values in `<style>`) is concatenated.
fn extract_text_with_position<B: BufRead>(
    reader: &mut Reader<B>,
    buf: &mut Vec<u8>,
    closing_tag: &[u8],
    content: &str,
    start_pos: usize,
) -> Result<String, ParseError> {
    let mut text = String::new();
    let closing_tag_str = String::from_utf8_lossy(closing_tag);

    loop {
        let current_pos = reader.buffer_position() as usize;
        match reader.read_event_into(buf) {
            Ok(Event::Text(e)) => {
                text.push_str(&e.unescape().map_err(|e| {
                    syntax_error(content, current_pos, format!("Invalid XML text content: {e}"))
                })?);
            }
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::End(e)) if e.name() == QName(closing_tag) => break,
            Ok(Event::Eof) => {
                let end_pos = reader.buffer_position() as usize;
                return Err(syntax_error(
                    content,
                    current_pos,
                    format!("Unexpected EOF while looking for closing tag '{closing_tag_str}'"),
                )
                .with_span(SourceSpan::new(start_pos, end_pos)));
            }
            Err(e) => {
                let end_pos = reader.buffer_position() as usize;
                return Err(
                    syntax_error(content, current_pos, format!("XML parsing error: {e}"))
                        .with_span(SourceSpan::new(start_pos, end_pos)),
                );
            }
            _ => (),
        }
        buf.clear();
    }
    buf.clear();

    Ok(text.trim().to_string())
}

fn syntax_error(content: &str, pos: usize, message: String) -> ParseError {
    ParseError::syntax_at(line_number_at(content, pos), CitationFormat::EndNoteXml, message)
}

/// Parse EndNote XML content into citations, one per `<record>`.
pub(crate) fn parse_endnote_xml(content: &str) -> Result<Vec<Citation>, ParseError> {
    let mut reader = Reader::from_str(content);

    let mut citations = Vec::new();
    let mut buf = Vec::new();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name() == QName(b"record") => {
                buf.clear();
                let fields = parse_record(&mut reader, &mut buf, content, pos)?;
                citations.push(fields.into_citation(citations.len()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                let pos = reader.buffer_position() as usize;
                return Err(syntax_error(content, pos, format!("XML parsing error: {e}")));
            }
            _ => (),
        }
        buf.clear();
    }

    Ok(citations)
}

/// The values read from one `<record>`. The first occurrence of each single-valued
/// element wins.
#[derive(Debug, Default)]
struct RecordFields {
    rec_number: Option<String>,
    title: Option<String>,
    abstract_text: Option<String>,
    year: Option<String>,
    journal: Option<String>,
    doi: Option<String>,
    authors: Vec<String>,
    keywords: Vec<String>,
}

impl RecordFields {
    /// Build the citation; `ordinal` is the number of records already parsed.
    fn into_citation(self, ordinal: usize) -> Citation {
        let mut citation = Citation::from_source(CitationFormat::EndNoteXml);
        citation.id = match self.rec_number.filter(|n| !n.is_empty()) {
            Some(rec_number) => {
                let id = format!("EndNote_{rec_number}");
                citation = citation.with_raw("rec_number", rec_number);
                id
            }
            None => format!("EndNote_{ordinal}"),
        };
        Citation {
            title: self.title.unwrap_or_default(),
            abstract_text: self.abstract_text.unwrap_or_default(),
            year: self
                .year
                .map(YearValue::Text)
                .and_then(|year| normalize_year(Some(&year)))
                .map(YearValue::from),
            authors: self.authors,
            journal: self.journal.unwrap_or_default(),
            doi: self.doi.unwrap_or_default(),
            keywords: self.keywords,
            ..citation
        }
    }
}

/// Parse a single record element.
fn parse_record<B: BufRead>(
    reader: &mut Reader<B>,
    buf: &mut Vec<u8>,
    content: &str,
    start_pos: usize,
) -> Result<RecordFields, ParseError> {
    let mut fields = RecordFields::default();
    let mut in_contributors = 0usize;
    let mut in_keywords = 0usize;

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event_into(buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                buf.clear();
                match name.as_slice() {
                    b"contributors" => in_contributors += 1,
                    b"keywords" => in_keywords += 1,
                    b"author" if in_contributors > 0 => {
                        let author = extract_text_with_position(reader, buf, b"author", content, pos)?;
                        if !author.is_empty() {
                            fields.authors.push(author);
                        }
                    }
                    b"keyword" if in_keywords > 0 => {
                        let keyword = extract_text_with_position(reader, buf, b"keyword", content, pos)?;
                        if !keyword.is_empty() {
                            fields.keywords.push(keyword);
                        }
                    }
                    b"rec-number" => first(
                        &mut fields.rec_number,
                        extract_text_with_position(reader, buf, b"rec-number", content, pos)?,
                    ),
                    b"title" => first(
                        &mut fields.title,
                        extract_text_with_position(reader, buf, b"title", content, pos)?,
                    ),
                    b"abstract" => first(
                        &mut fields.abstract_text,
                        extract_text_with_position(reader, buf, b"abstract", content, pos)?,
                    ),
                    b"year" => first(
                        &mut fields.year,
                        extract_text_with_position(reader, buf, b"year", content, pos)?,
                    ),
                    b"secondary-title" => first(
                        &mut fields.journal,
                        extract_text_with_position(reader, buf, b"secondary-title", content, pos)?,
                    ),
                    b"electronic-resource-num" => first(
                        &mut fields.doi,
                        extract_text_with_position(
                            reader,
                            buf,
                            b"electronic-resource-num",
                            content,
                            pos,
                        )?,
                    ),
                    _ => (),
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"record" => break,
                b"contributors" => in_contributors = in_contributors.saturating_sub(1),
                b"keywords" => in_keywords = in_keywords.saturating_sub(1),
                _ => (),
            },
            Ok(Event::Eof) => {
                return Err(syntax_error(
                    content,
                    start_pos,
                    "Unexpected EOF inside <record>".to_string(),
                )
                .with_span(SourceSpan::new(start_pos, content.len())));
            }
            Err(e) => {
                let pos = reader.buffer_position() as usize;
                return Err(syntax_error(content, pos, format!("XML parsing error: {e}")));
            }
            _ => (),
        }
        buf.clear();
    }

    Ok(fields)
}

fn first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_styled_values() {
        let xml = r#"<xml><records><record>
<rec-number>12</rec-number>
<contributors><authors>
  <author><style face="normal" font="default" size="100%">Smith, John A.</style></author>
  <author><style face="normal" font="default" size="100%">Doe, Jane</style></author>
</authors></contributors>
<titles>
  <title><style face="normal" font="default" size="100%">Effects of </style><style face="italic" font="default" size="100%">in vitro</style><style face="normal" font="default" size="100%"> culture</style></title>
  <secondary-title><style face="normal" font="default" size="100%">Cell Reports</style></secondary-title>
</titles>
<dates><year><style face="normal" font="default" size="100%">2021</style></year></dates>
<electronic-resource-num><style face="normal" font="default" size="100%">10.1016/j.celrep.2021.01.001</style></electronic-resource-num>
</record></records></xml>"#;

        let citations = parse_endnote_xml(xml).unwrap();
        let citation = &citations[0];
        assert_eq!(citation.id, "EndNote_12");
        assert_eq!(citation.title, "Effects of in vitro culture");
        assert_eq!(citation.authors, vec!["Smith, John A.", "Doe, Jane"]);
        assert_eq!(citation.journal, "Cell Reports");
        assert_eq!(citation.year, Some(YearValue::Int(2021)));
        assert_eq!(citation.doi, "10.1016/j.celrep.2021.01.001");
        assert_eq!(citation.raw_data["rec_number"], "12");
    }

    #[test]
    fn test_ordinal_ids_without_rec_number() {
        let xml = r#"<xml><records>
<record><titles><title>First</title></titles></record>
<record><rec-number>5</rec-number><titles><title>Second</title></titles></record>
<record><titles><title>Third</title></titles></record>
</records></xml>"#;

        let citations = parse_endnote_xml(xml).unwrap();
        let ids: Vec<_> = citations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["EndNote_0", "EndNote_5", "EndNote_2"]);
        assert!(!citations[0].raw_data.contains_key("rec_number"));
    }

    #[test]
    fn test_authors_outside_contributors_are_ignored() {
        let xml = r#"<xml><records><record>
<author>Stray Author</author>
<contributors><secondary-authors><author>Editor, E.</author></secondary-authors></contributors>
</record></records></xml>"#;

        let citations = parse_endnote_xml(xml).unwrap();
        assert_eq!(citations[0].authors, vec!["Editor, E."]);
    }

    #[test]
    fn test_record_without_title_is_kept() {
        let xml = "<xml><records><record><rec-number>1</rec-number></record></records></xml>";
        let citations = parse_endnote_xml(xml).unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, "");
        assert_eq!(citations[0].year, None);
    }

    #[test]
    fn test_unterminated_title_reports_line() {
        let xml = "<xml><records>\n<record>\n<titles><title>Broken";
        let err = parse_endnote_xml(xml).unwrap_err();
        assert_eq!(err.format, CitationFormat::EndNoteXml);
        assert_eq!(err.line, Some(3));
        assert!(err.span.is_some());
    }

    #[test]
    fn test_mismatched_close_is_error() {
        let xml = "<xml><records><record><titles></record></records></xml>";
        assert!(parse_endnote_xml(xml).is_err());
    }
}
