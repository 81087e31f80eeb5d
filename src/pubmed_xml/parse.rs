//! Event-driven parsing of PubMed XML.
//!
//! Each `<PubmedArticle>` is walked with a stack of open element names so that fields
//! can be recognised by context (`Journal/Title` versus `ArticleTitle`, authors only
//! inside `<Article>`). Text inside a captured element is concatenated across inline
//! markup such as `<i>` or `<sup>`.

use crate::error::ParseError;
use crate::pubmed_xml::structure::RawPubmedArticle;
use crate::utils::{line_number_at, squash_whitespace};
use crate::{Citation, CitationFormat};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

/// Parse PubMed XML content into citations.
///
/// Articles without a PMID or without an `<Article>` element are skipped.
pub(crate) fn parse_pubmed_xml(content: &str) -> Result<Vec<Citation>, ParseError> {
    let mut reader = Reader::from_str(content);
    let mut buf = Vec::new();
    let mut citations = Vec::new();
    let mut article: Option<ArticleWalker> = None;

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if let Some(walker) = article.as_mut() {
                    walker.start(e, content, pos)?;
                } else if e.local_name().as_ref() == b"PubmedArticle" {
                    article = Some(ArticleWalker::new(line_number_at(content, pos)));
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(walker) = article.as_mut() {
                    walker.start(e, content, pos)?;
                    walker.end();
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"PubmedArticle" && article.is_some() {
                    if let Some(walker) = article.take() {
                        let raw = walker.finish();
                        let line = raw.start_line;
                        match raw.into_citation() {
                            Some(citation) => citations.push(citation),
                            None => debug!(line, "Skipping PubmedArticle without PMID or Article"),
                        }
                    }
                } else if let Some(walker) = article.as_mut() {
                    walker.end();
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(walker) = article.as_mut().filter(|walker| walker.is_capturing()) {
                    let text = e.unescape().map_err(|err| {
                        syntax_error(content, pos, format!("Invalid XML text content: {err}"))
                    })?;
                    walker.text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(walker) = article.as_mut().filter(|walker| walker.is_capturing()) {
                    walker.text(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => {
                if let Some(walker) = article.as_ref() {
                    return Err(syntax_error(
                        content,
                        content.len(),
                        format!(
                            "Unexpected EOF inside PubmedArticle opened at line {}",
                            walker.raw.start_line
                        ),
                    ));
                }
                break;
            }
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

fn syntax_error(content: &str, pos: usize, message: String) -> ParseError {
    ParseError::syntax_at(line_number_at(content, pos), CitationFormat::PubMedXml, message)
}

/// A field whose text is being collected.
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Pmid,
    Title,
    AbstractText { label: Option<String> },
    LastName,
    ForeName,
    Journal,
    PubYear,
    MedlineDate,
    Doi,
    Mesh,
    Keyword,
}

#[derive(Debug)]
struct Capture {
    field: Field,
    /// Stack depth of the element that opened the capture.
    depth: usize,
    text: String,
}

/// Walks the inside of one `<PubmedArticle>`.
struct ArticleWalker {
    path: Vec<String>,
    capture: Option<Capture>,
    last_name: String,
    fore_name: String,
    raw: RawPubmedArticle,
}

impl ArticleWalker {
    fn new(start_line: usize) -> Self {
        Self {
            path: Vec::new(),
            capture: None,
            last_name: String::new(),
            fore_name: String::new(),
            raw: RawPubmedArticle {
                start_line,
                ..Default::default()
            },
        }
    }

    fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    fn in_article(&self) -> bool {
        self.path.iter().any(|name| name == "Article")
    }

    /// Name of the `n`-th ancestor of the current element (1 = parent).
    fn ancestor(&self, n: usize) -> Option<&str> {
        self.path
            .len()
            .checked_sub(n + 1)
            .and_then(|index| self.path.get(index))
            .map(String::as_str)
    }

    fn start(&mut self, e: &BytesStart, content: &str, pos: usize) -> Result<(), ParseError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        self.path.push(name);
        if self.capture.is_some() {
            return Ok(());
        }

        let name = self.path.last().map(String::as_str).unwrap_or_default();
        if name == "Article" {
            self.raw.has_article = true;
        }
        if name == "Author" && self.in_article() {
            self.last_name.clear();
            self.fore_name.clear();
        }

        if let Some(field) = self.field_for(name, e, content, pos)? {
            self.capture = Some(Capture {
                field,
                depth: self.path.len(),
                text: String::new(),
            });
        }
        Ok(())
    }

    fn field_for(
        &self,
        name: &str,
        e: &BytesStart,
        content: &str,
        pos: usize,
    ) -> Result<Option<Field>, ParseError> {
        let in_article = self.in_article();
        let parent = self.ancestor(1);

        let field = match name {
            "PMID" if self.raw.pmid.is_none() => Some(Field::Pmid),
            "ArticleTitle" if in_article && self.raw.title.is_empty() => Some(Field::Title),
            "AbstractText"
                if in_article && self.path.iter().any(|name| name == "Abstract") =>
            {
                Some(Field::AbstractText {
                    label: attribute(e, "Label", content, pos)?,
                })
            }
            "LastName" if in_article && parent == Some("Author") => Some(Field::LastName),
            "ForeName" if in_article && parent == Some("Author") => Some(Field::ForeName),
            "Title" if in_article && parent == Some("Journal") && self.raw.journal.is_empty() => {
                Some(Field::Journal)
            }
            "Year" | "MedlineDate"
                if in_article
                    && parent == Some("PubDate")
                    && self.ancestor(2) == Some("JournalIssue") =>
            {
                if name == "Year" {
                    Some(Field::PubYear)
                } else {
                    Some(Field::MedlineDate)
                }
            }
            "ELocationID" if in_article && self.raw.doi.is_none() => {
                let kind = attribute(e, "EIdType", content, pos)?;
                (kind.as_deref() == Some("doi")).then_some(Field::Doi)
            }
            "DescriptorName" if parent == Some("MeshHeading") => Some(Field::Mesh),
            "Keyword" => Some(Field::Keyword),
            _ => None,
        };
        Ok(field)
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn end(&mut self) {
        if self
            .capture
            .as_ref()
            .is_some_and(|capture| capture.depth == self.path.len())
            && let Some(capture) = self.capture.take()
        {
            self.store(capture.field, squash_whitespace(&capture.text));
        }

        let closed = self.path.pop();
        if closed.as_deref() == Some("Author") && self.in_article() && !self.last_name.is_empty()
        {
            let name = format!("{} {}", self.last_name, self.fore_name);
            self.raw.authors.push(name.trim().to_string());
        }
    }

    fn store(&mut self, field: Field, text: String) {
        match field {
            Field::Pmid => self.raw.pmid = Some(text),
            Field::Title => self.raw.title = text,
            Field::AbstractText { label } => {
                let part = match label.filter(|label| !label.is_empty()) {
                    Some(label) => format!("{label}: {text}").trim().to_string(),
                    None => text,
                };
                self.raw.abstract_parts.push(part);
            }
            Field::LastName => self.last_name = text,
            Field::ForeName => self.fore_name = text,
            Field::Journal => self.raw.journal = text,
            Field::PubYear => {
                if self.raw.pub_year.is_none() {
                    self.raw.pub_year = Some(text);
                }
            }
            Field::MedlineDate => {
                if self.raw.medline_date.is_none() {
                    self.raw.medline_date = Some(text);
                }
            }
            Field::Doi => self.raw.doi = Some(text),
            Field::Mesh if !text.is_empty() => self.raw.mesh_terms.push(text),
            Field::Keyword if !text.is_empty() => self.raw.keywords.push(text),
            Field::Mesh | Field::Keyword => (),
        }
    }

    fn finish(self) -> RawPubmedArticle {
        self.raw
    }
}

/// Unescaped value of attribute `key`, if present.
fn attribute(
    e: &BytesStart,
    key: &str,
    content: &str,
    pos: usize,
) -> Result<Option<String>, ParseError> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| syntax_error(content, pos, format!("Invalid attribute: {err}")))?;
    attr.map(|attr| {
        attr.unescape_value()
            .map(|value| value.into_owned())
            .map_err(|err| syntax_error(content, pos, format!("Invalid attribute value: {err}")))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::YearValue;
    use pretty_assertions::assert_eq;

    const ARTICLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2019//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_190101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">31181385</PMID>
      <Article PubModel="Print-Electronic">
        <Journal>
          <ISSN IssnType="Electronic">1553-7374</ISSN>
          <JournalIssue CitedMedium="Internet">
            <Volume>15</Volume>
            <PubDate>
              <Year>2019</Year>
              <Month>Jun</Month>
            </PubDate>
          </JournalIssue>
          <Title>PLoS pathogens</Title>
        </Journal>
        <ArticleTitle>Fantastic yeasts and where to find them: the <i>hidden</i> diversity of dimorphic fungal pathogens.</ArticleTitle>
        <ELocationID EIdType="pii" ValidYN="Y">e1007807</ELocationID>
        <ELocationID EIdType="doi" ValidYN="Y">10.1371/journal.ppat.1007807</ELocationID>
        <Abstract>
          <AbstractText Label="BACKGROUND">Dimorphic fungi are &amp; remain understudied.</AbstractText>
          <AbstractText Label="RESULTS">We found many.</AbstractText>
        </Abstract>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Van Dyke</LastName>
            <ForeName>Marley C Caballero</ForeName>
            <Initials>MCC</Initials>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>Consortium</CollectiveName>
          </Author>
          <Author ValidYN="Y">
            <LastName>Teixeira</LastName>
          </Author>
        </AuthorList>
      </Article>
      <MeshHeadingList>
        <MeshHeading>
          <DescriptorName UI="D006801" MajorTopicYN="N">Humans</DescriptorName>
          <QualifierName UI="Q000382" MajorTopicYN="N">microbiology</QualifierName>
        </MeshHeading>
        <MeshHeading>
          <DescriptorName UI="D005658" MajorTopicYN="Y">Fungi</DescriptorName>
        </MeshHeading>
      </MeshHeadingList>
      <KeywordList Owner="NOTNLM">
        <Keyword MajorTopicYN="N">dimorphism</Keyword>
        <Keyword MajorTopicYN="N">thermal adaptation</Keyword>
      </KeywordList>
    </MedlineCitation>
    <PubmedData>
      <ArticleIdList>
        <ArticleId IdType="pubmed">31181385</ArticleId>
      </ArticleIdList>
    </PubmedData>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_full_article() {
        let citations = parse_pubmed_xml(ARTICLE).unwrap();
        assert_eq!(citations.len(), 1);
        let citation = &citations[0];
        assert_eq!(citation.id, "PMID:31181385");
        assert_eq!(
            citation.title,
            "Fantastic yeasts and where to find them: the hidden diversity of dimorphic fungal pathogens."
        );
        assert_eq!(
            citation.abstract_text,
            "BACKGROUND: Dimorphic fungi are & remain understudied. RESULTS: We found many."
        );
        assert_eq!(citation.authors, vec!["Van Dyke Marley C Caballero", "Teixeira"]);
        assert_eq!(citation.journal, "PLoS pathogens");
        assert_eq!(citation.year, Some(YearValue::Int(2019)));
        assert_eq!(citation.doi, "10.1371/journal.ppat.1007807");
        assert_eq!(citation.mesh_terms, vec!["Humans", "Fungi"]);
        assert_eq!(citation.keywords, vec!["dimorphism", "thermal adaptation"]);
        assert_eq!(citation.raw_data["pmid"], "31181385");
    }

    #[test]
    fn test_unlabelled_abstract_and_medline_date() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
<PMID>1</PMID>
<Article>
  <Journal><JournalIssue><PubDate><MedlineDate>1998 Dec-1999 Jan</MedlineDate></PubDate></JournalIssue></Journal>
  <ArticleTitle>Title</ArticleTitle>
  <Abstract><AbstractText>Plain abstract.</AbstractText></Abstract>
</Article>
</MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let citations = parse_pubmed_xml(xml).unwrap();
        assert_eq!(citations[0].abstract_text, "Plain abstract.");
        assert_eq!(citations[0].year(), Some(1998));
        assert_eq!(citations[0].doi, "");
    }

    #[test]
    fn test_skips_articles_without_pmid_or_article() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle><MedlineCitation><Article><ArticleTitle>No PMID</ArticleTitle></Article></MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><PMID>2</PMID></MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><PMID>3</PMID><Article><ArticleTitle>Kept</ArticleTitle></Article></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let citations = parse_pubmed_xml(xml).unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].id, "PMID:3");
    }

    #[test]
    fn test_comment_pmids_do_not_override() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
<PMID>10</PMID>
<Article><ArticleTitle>T</ArticleTitle></Article>
<CommentsCorrectionsList><CommentsCorrections><PMID>99</PMID></CommentsCorrections></CommentsCorrectionsList>
</MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let citations = parse_pubmed_xml(xml).unwrap();
        assert_eq!(citations[0].id, "PMID:10");
    }

    #[test]
    fn test_empty_abstract_text_element() {
        let xml = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
<PMID>4</PMID>
<Article><ArticleTitle>T</ArticleTitle><Abstract><AbstractText Label="METHODS"/><AbstractText>Body.</AbstractText></Abstract></Article>
</MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

        let citations = parse_pubmed_xml(xml).unwrap();
        assert_eq!(citations[0].abstract_text, "METHODS: Body.");
    }

    #[test]
    fn test_mismatched_tags_are_errors() {
        let xml = "<PubmedArticleSet>\n<PubmedArticle>\n<MedlineCitation></PubmedArticle>";
        let err = parse_pubmed_xml(xml).unwrap_err();
        assert_eq!(err.format, CitationFormat::PubMedXml);
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn test_truncated_article_is_error() {
        let xml = "<PubmedArticleSet>\n<PubmedArticle>\n<MedlineCitation><PMID>1</PMID>";
        assert!(parse_pubmed_xml(xml).is_err());
    }

    #[test]
    fn test_empty_set() {
        let citations = parse_pubmed_xml("<PubmedArticleSet></PubmedArticleSet>").unwrap();
        assert!(citations.is_empty());
    }
}
