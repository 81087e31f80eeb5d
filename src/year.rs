//! Publication year normalization.
//!
//! Exports disagree wildly on how a year is written: `2020`, `2020.0`, `"2020 Jun 9"`,
//! `"2019 Dec-2020 Jan"`, `"Spring 2018"`. [`normalize_year`] coerces any of them to a
//! four-digit year or gives up quietly. It never fails.

use crate::regex::Regex;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Earliest year accepted on the numeric path and by validation.
pub const MIN_YEAR: i64 = 1900;
/// Latest year accepted on the numeric path and by validation.
pub const MAX_YEAR: i64 = 2100;

static YEAR_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Full-date layouts tried before the token-level fallback.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y %b %d",
    "%Y %B %d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// A year as some source wrote it.
///
/// Parsers always produce [`YearValue::Int`]; the other variants exist for records
/// arriving from collaborators that do not normalize (spreadsheets, JSON stores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl YearValue {
    /// Coerce this value to a canonical four-digit year, see [`normalize_year`].
    pub fn normalize(&self) -> Option<i32> {
        match self {
            YearValue::Int(year) => in_range(*year),
            YearValue::Float(year) if year.is_finite() => in_range(year.trunc() as i64),
            YearValue::Float(_) => None,
            YearValue::Text(text) => normalize_text(text),
        }
    }
}

impl From<i32> for YearValue {
    fn from(year: i32) -> Self {
        YearValue::Int(year.into())
    }
}

impl From<i64> for YearValue {
    fn from(year: i64) -> Self {
        YearValue::Int(year)
    }
}

impl From<f64> for YearValue {
    fn from(year: f64) -> Self {
        YearValue::Float(year)
    }
}

impl From<&str> for YearValue {
    fn from(year: &str) -> Self {
        YearValue::Text(year.to_string())
    }
}

impl From<String> for YearValue {
    fn from(year: String) -> Self {
        YearValue::Text(year)
    }
}

impl std::fmt::Display for YearValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearValue::Int(year) => write!(f, "{year}"),
            YearValue::Float(year) => write!(f, "{year}"),
            YearValue::Text(year) => f.write_str(year),
        }
    }
}

/// Coerce a heterogeneous year representation to a four-digit year.
///
/// - `None`, empty text and NaN give `None`.
/// - Numbers are truncated and kept only inside `[1900, 2100]`.
/// - Text is parsed as a date first; the parsed year is returned as is. If that fails
///   the first `19xx`/`20xx` token anywhere in the text is used.
///
/// # Examples
///
/// ```
/// use bibscreen::{normalize_year, YearValue};
///
/// assert_eq!(normalize_year(Some(&YearValue::Int(2020))), Some(2020));
/// assert_eq!(normalize_year(Some(&YearValue::Float(1999.0))), Some(1999));
/// assert_eq!(normalize_year(Some(&"2020 Jun 9".into())), Some(2020));
/// assert_eq!(normalize_year(Some(&"Spring 2018".into())), Some(2018));
/// assert_eq!(normalize_year(Some(&YearValue::Int(1850))), None);
/// assert_eq!(normalize_year(None), None);
/// ```
pub fn normalize_year(value: Option<&YearValue>) -> Option<i32> {
    value.and_then(YearValue::normalize)
}

fn in_range(year: i64) -> Option<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        i32::try_from(year).ok()
    } else {
        None
    }
}

fn normalize_text(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return None;
    }
    parse_date_year(text).or_else(|| find_year_token(text))
}

/// The year of `text` read as a date, full or partial.
fn parse_date_year(text: &str) -> Option<i32> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.year());
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.year());
    }
    if let Some(date) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(date.year());
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date.year());
    }
    parse_partial_date(text)
}

/// Token-level reading of dates such as `2020 Jun`, `Mar 2019`, `1998///`,
/// `Tuesday, 3rd March 2015`.
///
/// Every token must be a year, a month, a day, a weekday or a clock time, otherwise the
/// text is not a date. Exactly one four-digit year must be present.
fn parse_partial_date(text: &str) -> Option<i32> {
    let mut year = None;
    let mut small_numbers = 0;

    for token in text
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '/' | '.'))
        .filter(|token| !token.is_empty())
    {
        if token.chars().all(|c| c.is_ascii_digit()) {
            match token.len() {
                4 => {
                    if year.is_some() {
                        return None;
                    }
                    year = token.parse::<i32>().ok();
                }
                1 | 2 => {
                    small_numbers += 1;
                    let value: u32 = token.parse().ok()?;
                    if value == 0 || value > 31 || small_numbers > 2 {
                        return None;
                    }
                }
                _ => return None,
            }
        } else if is_ordinal_day(token)
            || month_number(token).is_some()
            || is_weekday(token)
            || is_clock_time(token)
        {
            continue;
        } else {
            return None;
        }
    }

    year
}

fn find_year_token(text: &str) -> Option<i32> {
    YEAR_TOKEN_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Month number for an English month name or abbreviation.
fn month_number(token: &str) -> Option<u32> {
    match token.to_lowercase().as_str() {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn is_weekday(token: &str) -> bool {
    matches!(
        token.to_lowercase().as_str(),
        "mon" | "monday"
            | "tue" | "tues" | "tuesday"
            | "wed" | "wednesday"
            | "thu" | "thur" | "thurs" | "thursday"
            | "fri" | "friday"
            | "sat" | "saturday"
            | "sun" | "sunday"
    )
}

fn is_ordinal_day(token: &str) -> bool {
    let lower = token.to_lowercase();
    let digits = lower.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &lower[digits.len()..];
    matches!(suffix, "st" | "nd" | "rd" | "th")
        && digits
            .parse::<u32>()
            .is_ok_and(|day| (1..=31).contains(&day))
}

fn is_clock_time(token: &str) -> bool {
    token.contains(':') && token.chars().all(|c| c.is_ascii_digit() || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(YearValue::Int(2020), Some(2020))]
    #[case(YearValue::Int(1900), Some(1900))]
    #[case(YearValue::Int(2100), Some(2100))]
    #[case(YearValue::Int(1899), None)]
    #[case(YearValue::Int(2101), None)]
    #[case(YearValue::Float(2019.7), Some(2019))]
    #[case(YearValue::Float(f64::NAN), None)]
    #[case(YearValue::Float(f64::INFINITY), None)]
    fn test_numeric_years(#[case] value: YearValue, #[case] expected: Option<i32>) {
        assert_eq!(normalize_year(Some(&value)), expected);
    }

    #[rstest]
    #[case("2020", Some(2020))]
    #[case(" 2021 ", Some(2021))]
    #[case("2020-03-15", Some(2020))]
    #[case("2020-03-15T10:30:00Z", Some(2020))]
    #[case("2020 Jun 9", Some(2020))]
    #[case("2023 May", Some(2023))]
    #[case("March 5, 2017", Some(2017))]
    #[case("5 March 2017", Some(2017))]
    #[case("Tuesday, 3rd March 2015", Some(2015))]
    #[case("1998///", Some(1998))]
    #[case("1999/12/25/Christmas edition", Some(1999))]
    #[case("2019 Dec-2020 Jan", Some(2019))]
    #[case("Spring 2018", Some(2018))]
    #[case("circa 1850", None)]
    #[case("Invalid", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("nan", None)]
    fn test_text_years(#[case] text: &str, #[case] expected: Option<i32>) {
        assert_eq!(normalize_year(Some(&YearValue::from(text))), expected);
    }

    #[test]
    fn test_text_years_are_not_range_checked() {
        // A date the parser understands is taken at face value.
        assert_eq!(normalize_year(Some(&"1850".into())), Some(1850));
    }

    #[test]
    fn test_none_is_absent() {
        assert_eq!(normalize_year(None), None);
    }

    #[test]
    fn test_years_are_fixed_points() {
        for source in ["2020 Jun 9", "Spring 2018", "2019-01-01", "1998///"] {
            let year = normalize_year(Some(&source.into())).unwrap();
            assert_eq!(normalize_year(Some(&YearValue::from(year))), Some(year));
        }
    }

    #[test]
    fn test_untagged_serde() {
        let values: Vec<YearValue> = serde_json::from_str(r#"[2020, 2020.5, "2020"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                YearValue::Int(2020),
                YearValue::Float(2020.5),
                YearValue::Text("2020".to_string())
            ]
        );
    }

    #[rstest]
    #[case(YearValue::Int(1800), "1800")]
    #[case(YearValue::Float(1800.5), "1800.5")]
    #[case(YearValue::Text("Invalid".to_string()), "Invalid")]
    fn test_display(#[case] value: YearValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}
