use crate::pubmed::fields;
use crate::pubmed::split::PmidSplit;
use crate::pubmed::structure::RawPubmedData;
use std::borrow::Cow;
use tracing::debug;

/// Parse the content of a MEDLINE formatted .nbib file into one [RawPubmedData] per
/// entry, dropping entries that have neither a PMID nor a title.
pub(crate) fn pubmed_parse<S: AsRef<str>>(nbib_text: S) -> Vec<RawPubmedData> {
    let text = normalize_line_breaks(nbib_text.as_ref());
    PmidSplit::new(&text)
        .filter(|(_, chunk)| !chunk.trim().is_empty())
        .map(|(line_number, chunk)| pubmed_parse_one(chunk.trim(), line_number))
        .filter(|raw| {
            if raw.is_noise() {
                debug!(line = raw.start_line, "Dropping MEDLINE entry without PMID or title");
            }
            !raw.is_noise()
        })
        .collect()
}

fn pubmed_parse_one(entry: &str, start_line: usize) -> RawPubmedData {
    RawPubmedData {
        pmid: fields::pmid(entry),
        title: fields::title(entry),
        abstract_text: fields::abstract_text(entry),
        authors: fields::authors(entry),
        journal: fields::journal(entry),
        doi: fields::doi(entry),
        year: fields::year(entry),
        mesh_terms: fields::mesh_terms(entry),
        start_line,
    }
}

fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
