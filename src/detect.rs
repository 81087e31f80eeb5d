//! Classify a citation export from its file name and content.
//!
//! Detection is a pure function over the bytes. Invalid UTF-8 is replaced, never
//! reported, so detection itself cannot fail: anything it cannot classify comes back
//! as [`CitationFormat::Unknown`] or [`CitationFormat::UnknownXml`].

use crate::CitationFormat;

/// How many decoded characters the content heuristics look at.
const SNIFF_CHARS: usize = 2000;

/// Field markers that identify MEDLINE text inside a `.txt` file. Matched case-sensitively.
const MEDLINE_MARKERS: &[&str] = &[
    "PMID:", "PMID-", "TI  -", "AB  -", "FAU  -", "AU  -", "LID  -", "DP  -",
];

/// Detect the format of a citation export.
///
/// Extension rules run first (`.ris`, `.csv`, `.nbib`, then `.xml` and `.txt` with a look
/// at the content), followed by content-only heuristics over the first 2000 characters.
///
/// # Examples
///
/// ```
/// use bibscreen::{detect_format, CitationFormat};
///
/// assert_eq!(detect_format("refs.RIS", b""), CitationFormat::Ris);
/// assert_eq!(
///     detect_format("export.txt", b"PMID- 31234567\nTI  - A title"),
///     CitationFormat::PubMedText
/// );
/// assert_eq!(detect_format("notes.txt", b"dear diary"), CitationFormat::Unknown);
/// ```
pub fn detect_format(filename: &str, content: &[u8]) -> CitationFormat {
    let filename = filename.to_lowercase();

    if filename.ends_with(".ris") {
        return CitationFormat::Ris;
    }
    if filename.ends_with(".csv") {
        return CitationFormat::Csv;
    }
    if filename.ends_with(".nbib") {
        return CitationFormat::PubMedText;
    }

    let decoded = String::from_utf8_lossy(content);

    if filename.ends_with(".xml") {
        return detect_xml(&decoded.to_lowercase());
    }

    let snippet = leading_chars(&decoded, SNIFF_CHARS);
    if filename.ends_with(".txt") && MEDLINE_MARKERS.iter().any(|marker| snippet.contains(marker))
    {
        return CitationFormat::PubMedText;
    }

    sniff_content(&snippet.to_lowercase())
}

/// Classify the (lowercased) content of a `.xml` file.
fn detect_xml(lower: &str) -> CitationFormat {
    if lower.contains("<pubmedarticle") {
        CitationFormat::PubMedXml
    } else if lower.contains("<record") {
        // Also covers `<records`.
        CitationFormat::EndNoteXml
    } else {
        CitationFormat::UnknownXml
    }
}

/// Extension-independent guesses over a lowercased snippet.
fn sniff_content(snippet: &str) -> CitationFormat {
    if snippet.contains("ty  -") {
        CitationFormat::Ris
    } else if snippet.contains("<pubmedarticle") {
        CitationFormat::PubMedXml
    } else if snippet.contains("<record") {
        CitationFormat::EndNoteXml
    } else if snippet.starts_with("pmid-") || snippet.contains("pmid:") {
        CitationFormat::PubMedText
    } else {
        CitationFormat::Unknown
    }
}

fn leading_chars(text: &str, count: usize) -> &str {
    crate::utils::truncate_chars(text, count)
}
