/// An [Iterator] which splits MEDLINE text into entries, one per `PMID-` line.
///
/// A new entry starts at every line beginning with `PMID-`; text before the first
/// such line forms an entry of its own. [Iterator::next] returns each entry along with
/// its starting line number.
pub(crate) struct PmidSplit<'a> {
    line_number: usize,
    text: &'a str,
}

impl<'a> PmidSplit<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            line_number: 1,
            text,
        }
    }
}

impl<'a> Iterator for PmidSplit<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.text.is_empty() {
            return None;
        }
        let mut end = 0;
        let mut lines = 0;
        for line in self.text.split_inclusive('\n') {
            if lines > 0 && line.starts_with("PMID-") {
                break;
            }
            end += line.len();
            lines += 1;
        }
        let (part, rest) = self.text.split_at(end);
        let line_number = self.line_number;
        self.text = rest;
        self.line_number += lines;
        Some((line_number, part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("", &[])]
    #[case("PMID- 1", &[(1, "PMID- 1")])]
    #[case("PMID- 1\nTI  - One\n", &[(1, "PMID- 1\nTI  - One\n")])]
    #[case("PMID- 1\nTI  - One\nPMID- 2\n", &[(1, "PMID- 1\nTI  - One\n"), (3, "PMID- 2\n")])]
    #[case(
        "PMID- 1\nTI  - One\n\nPMID- 2\nTI  - Two\n",
        &[(1, "PMID- 1\nTI  - One\n\n"), (4, "PMID- 2\nTI  - Two\n")]
    )]
    #[case("\n\nPMID- 1\n", &[(1, "\n\n"), (3, "PMID- 1\n")])]
    #[case("TI  - no pmid\n", &[(1, "TI  - no pmid\n")])]
    #[case("PMID- 1\nAB  - see PMID- 2\n", &[(1, "PMID- 1\nAB  - see PMID- 2\n")])]
    fn test_pmid_split(#[case] text: &str, #[case] expected: &[(usize, &str)]) {
        let actual = PmidSplit::new(text).collect_vec();
        assert_eq!(&actual, expected)
    }
}
