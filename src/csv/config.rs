//! CSV header mapping definitions and configuration.
//!
//! This module defines the default header aliases and the configuration
//! structure for CSV parsing. Header matching is exact and case-sensitive.

use std::collections::HashMap;

/// The nine canonical citation fields a CSV column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitationField {
    Id,
    Title,
    Abstract,
    Year,
    Authors,
    Journal,
    Doi,
    MeshTerms,
    Keywords,
}

impl CitationField {
    /// Every canonical field, in record order.
    pub const ALL: [CitationField; 9] = [
        CitationField::Id,
        CitationField::Title,
        CitationField::Abstract,
        CitationField::Year,
        CitationField::Authors,
        CitationField::Journal,
        CitationField::Doi,
        CitationField::MeshTerms,
        CitationField::Keywords,
    ];

    /// The canonical column name, which is also the serialized field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationField::Id => "id",
            CitationField::Title => "title",
            CitationField::Abstract => "abstract",
            CitationField::Year => "year",
            CitationField::Authors => "authors",
            CitationField::Journal => "journal",
            CitationField::Doi => "doi",
            CitationField::MeshTerms => "mesh_terms",
            CitationField::Keywords => "keywords",
        }
    }

    /// Look up a field by its canonical column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

/// Default header aliases for common CSV column names.
///
/// Canonical names are handled separately and always map to themselves.
pub(crate) const DEFAULT_HEADERS: &[(&str, CitationField)] = &[
    ("pmid", CitationField::Id),
    ("PMID", CitationField::Id),
    ("Title", CitationField::Title),
    ("Abstract", CitationField::Abstract),
    ("Year", CitationField::Year),
    ("Publication Year", CitationField::Year),
    ("Authors", CitationField::Authors),
    ("Journal", CitationField::Journal),
    ("Journal/Book", CitationField::Journal),
    ("DOI", CitationField::Doi),
    ("MeSH Terms", CitationField::MeshTerms),
    ("Keywords", CitationField::Keywords),
];

/// Configuration for CSV parsing with custom header aliases.
///
/// # Examples
///
/// ```
/// use bibscreen::CsvConfig;
///
/// let mut config = CsvConfig::new();
/// config.add_header_alias("Article Name", "title");
/// config.set_delimiter(b';');
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Header text to canonical field name. Kept as text so that `validate` can
    /// report aliases that point nowhere.
    pub(crate) header_map: HashMap<String, String>,
    /// Delimiter to use for parsing the CSV
    pub(crate) delimiter: u8,
    /// Quote character
    pub(crate) quote: u8,
    /// Whether to trim whitespace
    pub(crate) trim: bool,
    /// Accept rows with more fields than the header
    pub(crate) flexible: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a new CSV configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        let header_map = DEFAULT_HEADERS
            .iter()
            .map(|(header, field)| (header.to_string(), field.as_str().to_string()))
            .collect();

        Self {
            header_map,
            delimiter: b',',
            quote: b'"',
            trim: true,
            flexible: false,
        }
    }

    /// Map an exact header spelling onto a canonical field name.
    pub fn add_header_alias(&mut self, header: &str, field: &str) -> &mut Self {
        self.header_map.insert(header.to_string(), field.to_string());
        self
    }

    /// Sets the delimiter character
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character
    pub fn set_quote(&mut self, quote: u8) -> &mut Self {
        self.quote = quote;
        self
    }

    /// Sets whether to trim whitespace from fields
    pub fn set_trim(&mut self, trim: bool) -> &mut Self {
        self.trim = trim;
        self
    }

    /// Sets whether rows longer than the header are accepted (surplus cells are dropped)
    pub fn set_flexible(&mut self, flexible: bool) -> &mut Self {
        self.flexible = flexible;
        self
    }

    /// Finds the canonical field for a header. Exact match only.
    pub(crate) fn field_for_header(&self, header: &str) -> Option<CitationField> {
        match self.header_map.get(header) {
            Some(field) => CitationField::from_name(field),
            None => CitationField::from_name(header),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err("Delimiter cannot be a newline character".to_string());
        }
        if self.delimiter == self.quote {
            return Err("Delimiter and quote must differ".to_string());
        }

        for (header, field) in &self.header_map {
            if header.is_empty() {
                return Err(format!("Empty alias found for field '{field}'"));
            }
            if CitationField::from_name(field).is_none() {
                return Err(format!(
                    "Alias '{header}' targets '{field}', which is not a citation field"
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("PMID", Some(CitationField::Id))]
    #[case("pmid", Some(CitationField::Id))]
    #[case("id", Some(CitationField::Id))]
    #[case("Title", Some(CitationField::Title))]
    #[case("title", Some(CitationField::Title))]
    #[case("Publication Year", Some(CitationField::Year))]
    #[case("Journal/Book", Some(CitationField::Journal))]
    #[case("MeSH Terms", Some(CitationField::MeshTerms))]
    #[case("mesh_terms", Some(CitationField::MeshTerms))]
    #[case("TITLE", None)]
    #[case("publication year", None)]
    #[case("Pmid", None)]
    #[case("Custom Field", None)]
    fn test_default_aliases(#[case] header: &str, #[case] expected: Option<CitationField>) {
        assert_eq!(CsvConfig::new().field_for_header(header), expected);
    }

    #[test]
    fn test_add_header_alias() {
        let mut config = CsvConfig::new();
        config.add_header_alias("Article Name", "title");

        assert_eq!(config.field_for_header("Article Name"), Some(CitationField::Title));
        assert_eq!(config.field_for_header("Title"), Some(CitationField::Title));
        assert_eq!(config.field_for_header("article name"), None);
    }

    #[test]
    fn test_validate_success() {
        assert!(CsvConfig::new().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_target() {
        let mut config = CsvConfig::new();
        config.add_header_alias("Volume", "volume");
        let err = config.validate().unwrap_err();
        assert!(err.contains("'volume'"));
    }

    #[test]
    fn test_validate_empty_alias() {
        let mut config = CsvConfig::new();
        config.add_header_alias("", "title");
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case(b'\n')]
    #[case(b'\r')]
    #[case(b'"')]
    fn test_validate_invalid_delimiter(#[case] delimiter: u8) {
        let mut config = CsvConfig::new();
        config.set_delimiter(delimiter);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_chaining() {
        let mut config = CsvConfig::new();
        config
            .set_delimiter(b';')
            .set_quote(b'\'')
            .set_trim(false)
            .set_flexible(true);

        assert_eq!(config.delimiter, b';');
        assert_eq!(config.quote, b'\'');
        assert!(!config.trim);
        assert!(config.flexible);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in CitationField::ALL {
            assert_eq!(CitationField::from_name(field.as_str()), Some(field));
        }
    }
}
