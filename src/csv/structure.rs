//! CSV format data structures.
//!
//! This module defines intermediate data structures used during CSV parsing.

use crate::csv::config::CitationField;
use crate::utils::split_list;
use crate::{Citation, CitationFormat, YearValue, normalize_year};
use csv::StringRecord;
use std::collections::HashMap;

/// How each column of the header row is read.
#[derive(Debug, Clone)]
pub(crate) enum Column {
    /// Feeds a canonical field.
    Field(CitationField),
    /// Kept in provenance under its header text.
    Extra(String),
}

/// Structured raw data from one CSV row.
#[derive(Debug, Clone)]
pub(crate) struct RawCsvData {
    /// Cells of mapped columns
    pub(crate) fields: HashMap<CitationField, String>,
    /// Cells of unmapped columns, by header
    pub(crate) extra: serde_json::Map<String, serde_json::Value>,
    /// Line number for error reporting
    pub(crate) line_number: usize,
}

impl RawCsvData {
    /// Create a new RawCsvData from a CSV record and the resolved header row.
    ///
    /// Cells past the end of the header are ignored; missing trailing cells are absent.
    pub(crate) fn from_record(
        columns: &[Column],
        record: &StringRecord,
        trim: bool,
        line_number: usize,
    ) -> Self {
        let mut fields = HashMap::new();
        let mut extra = serde_json::Map::new();

        for (column, value) in columns.iter().zip(record.iter()) {
            let value = if trim { value.trim() } else { value };
            match column {
                Column::Field(field) => {
                    if !value.is_empty() {
                        fields.insert(*field, value.to_string());
                    }
                }
                Column::Extra(header) => {
                    extra.insert(header.clone(), serde_json::Value::from(value));
                }
            }
        }

        Self {
            fields,
            extra,
            line_number,
        }
    }

    /// Get a mapped cell, if present and non-empty.
    pub(crate) fn get_field(&self, field: CitationField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    fn text(&self, field: CitationField) -> String {
        self.get_field(field).unwrap_or_default().to_string()
    }

    fn list(&self, field: CitationField) -> Vec<String> {
        self.get_field(field).map(parse_list_cell).unwrap_or_default()
    }

    /// Convert into a [`Citation`].
    pub(crate) fn into_citation(self) -> Citation {
        let year = self
            .get_field(CitationField::Year)
            .map(parse_year_cell)
            .and_then(|year| normalize_year(Some(&year)))
            .map(YearValue::from);

        let mut citation = Citation::from_source(CitationFormat::Csv);
        if !self.extra.is_empty() {
            citation = citation.with_raw("extra", self.extra.clone());
        }

        Citation {
            id: self.text(CitationField::Id),
            title: self.text(CitationField::Title),
            abstract_text: self.text(CitationField::Abstract),
            year,
            authors: self.list(CitationField::Authors),
            journal: self.text(CitationField::Journal),
            doi: self.text(CitationField::Doi),
            mesh_terms: self.list(CitationField::MeshTerms),
            keywords: self.list(CitationField::Keywords),
            ..citation
        }
    }
}

/// Read a list cell. A JSON array of strings is already a list and passes through
/// unchanged; anything else is split on `;`.
pub(crate) fn parse_list_cell(cell: &str) -> Vec<String> {
    if cell.trim_start().starts_with('[')
        && let Ok(list) = serde_json::from_str::<Vec<String>>(cell)
    {
        return list;
    }
    split_list(cell)
}

/// Type a year cell the way a spreadsheet reader would: integer literal, decimal
/// literal, or text.
pub(crate) fn parse_year_cell(cell: &str) -> YearValue {
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i64>() {
        YearValue::Int(year)
    } else if let Ok(year) = cell.parse::<f64>()
        && year.is_finite()
    {
        YearValue::Float(year)
    } else {
        YearValue::Text(cell.to_string())
    }
}
