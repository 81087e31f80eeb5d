//! Small text helpers shared by the parsers and the validator.

/// Split a delimited list cell such as `"Doe J; Smith A"` on `;`.
///
/// Items are trimmed and empty items dropped.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Join the trimmed, non-empty lines of a wrapped field value with single spaces.
pub(crate) fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse every run of whitespace to a single space and trim the ends.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max` characters of `text`, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// 1-based line number of the byte offset `pos` in `content`.
///
/// Offsets past the end report the last line.
pub(crate) fn line_number_at(content: &str, pos: usize) -> usize {
    let end = pos.min(content.len());
    content.as_bytes()[..end]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count()
        + 1
}

/// Whether a value is blank or the literal `nan` a spreadsheet export leaves behind.
pub(crate) fn is_blank_or_nan(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Doe J; Smith A", vec!["Doe J", "Smith A"])]
    #[case("cancer;therapy;", vec!["cancer", "therapy"])]
    #[case("  single  ", vec!["single"])]
    #[case("", vec![])]
    #[case(" ; ; ", vec![])]
    fn test_split_list(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_list(input), expected);
    }

    #[test]
    fn test_collapse_lines() {
        assert_eq!(
            collapse_lines("A study of\n      wrapped titles\n"),
            "A study of wrapped titles"
        );
        assert_eq!(collapse_lines("one line"), "one line");
        assert_eq!(collapse_lines("\n\n"), "");
    }

    #[test]
    fn test_squash_whitespace() {
        assert_eq!(squash_whitespace("  a\n\t b   c "), "a b c");
    }

    #[rstest]
    #[case("Short", 50, "Short")]
    #[case("abcdef", 3, "abc")]
    #[case("héllo wörld", 7, "héllo w")]
    #[case("", 5, "")]
    fn test_truncate_chars(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_chars(text, max), expected);
    }

    #[test]
    fn test_line_number_at() {
        let content = "first\nsecond\nthird";
        assert_eq!(line_number_at(content, 0), 1);
        assert_eq!(line_number_at(content, 6), 2);
        assert_eq!(line_number_at(content, 13), 3);
        assert_eq!(line_number_at(content, 1000), 3);
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("nan", true)]
    #[case("NaN", true)]
    #[case("10.1000/test", false)]
    fn test_is_blank_or_nan(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_blank_or_nan(value), expected);
    }
}
