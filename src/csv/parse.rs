//! Row reading and header resolution for CSV exports.

use crate::CitationFormat;
use crate::csv::config::CsvConfig;
use crate::csv::structure::{Column, RawCsvData};
use crate::error::{ParseError, SourceSpan, ValueError};
use csv::ReaderBuilder;
use std::collections::HashSet;

/// Read every data row of a CSV export against the resolved header.
///
/// The first row is always the header row.
pub(crate) fn csv_parse<S: AsRef<str>>(
    csv_text: S,
    config: &CsvConfig,
) -> Result<Vec<RawCsvData>, ParseError> {
    let text = csv_text.as_ref();

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    config.validate().map_err(|msg| {
        ParseError::without_position(
            CitationFormat::Csv,
            ValueError::Config(format!("Invalid CSV configuration: {msg}")),
        )
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .quote(config.quote)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = resolve_columns(reader.headers()?.iter(), config);

    let mut raw_citations = Vec::new();
    for result in reader.records() {
        let record = result?;
        let position = record.position();
        let line_number = position.map(|p| p.line() as usize).unwrap_or_default();

        if record.len() > columns.len() && !config.flexible {
            let byte = position.map(|p| p.byte() as usize).unwrap_or_default();
            return Err(ParseError::at_line(
                line_number,
                CitationFormat::Csv,
                ValueError::Syntax(format!(
                    "Expected {} fields, saw {}",
                    columns.len(),
                    record.len()
                )),
            )
            .with_span(SourceSpan::new(byte, byte)));
        }

        raw_citations.push(RawCsvData::from_record(
            &columns,
            &record,
            config.trim,
            line_number,
        ));
    }

    Ok(raw_citations)
}

/// Resolve each header cell to a canonical field or an extra column. When two headers
/// resolve to the same field, the leftmost one wins and the other is kept as extra.
fn resolve_columns<'a>(headers: impl Iterator<Item = &'a str>, config: &CsvConfig) -> Vec<Column> {
    let mut seen = HashSet::new();
    headers
        .map(|header| match config.field_for_header(header) {
            Some(field) if seen.insert(field) => Column::Field(field),
            _ => Column::Extra(header.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::config::CitationField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_parse_basic() {
        let input = "Title,Authors,Year\nTest Article,Smith J,2023";
        let result = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_field(CitationField::Title), Some("Test Article"));
        assert_eq!(result[0].get_field(CitationField::Authors), Some("Smith J"));
        assert_eq!(result[0].line_number, 2);
    }

    #[test]
    fn test_csv_parse_custom_delimiter() {
        let input = "Title;Authors;Year\nTest Article;Smith J;2023";
        let mut config = CsvConfig::new();
        config.set_delimiter(b';');

        let result = csv_parse(input, &config).unwrap();
        assert_eq!(result[0].get_field(CitationField::Year), Some("2023"));
    }

    #[test]
    fn test_duplicate_mapping_leftmost_wins() {
        let input = "Title,title\nFirst,Second";
        let result = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(result[0].get_field(CitationField::Title), Some("First"));
        assert_eq!(result[0].extra["title"], "Second");
    }

    #[test]
    fn test_long_row_is_error_unless_flexible() {
        let input = "Title,DOI\nA,10.1/a\nB,10.1/b,surplus";
        let err = csv_parse(input, &CsvConfig::new()).unwrap_err();
        assert_eq!(err.format, CitationFormat::Csv);
        assert_eq!(err.line, Some(3));

        let mut config = CsvConfig::new();
        config.set_flexible(true);
        let result = csv_parse(input, &config).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].get_field(CitationField::Doi), Some("10.1/b"));
    }

    #[test]
    fn test_short_row_is_padded() {
        let input = "Title,DOI,Year\nOnly a title";
        let result = csv_parse(input, &CsvConfig::new()).unwrap();
        assert_eq!(result[0].get_field(CitationField::Title), Some("Only a title"));
        assert_eq!(result[0].get_field(CitationField::Year), None);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let mut config = CsvConfig::new();
        config.set_delimiter(b'\n');
        let err = csv_parse("Title\nA", &config).unwrap_err();
        assert!(matches!(err.error, ValueError::Config(_)));
    }

    #[test]
    fn test_header_only() {
        assert!(csv_parse("Title,Year\n", &CsvConfig::new()).unwrap().is_empty());
        assert!(csv_parse("   ", &CsvConfig::new()).unwrap().is_empty());
    }
}
