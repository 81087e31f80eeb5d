//! RIS format tags.
//!
//! Only the tags that feed a canonical field get their own variant; everything else
//! is carried as [`RisTag::Unknown`] and ends up in the provenance map untouched.
//! See: http://en.wikipedia.org/wiki/RIS_(file_format)

/// RIS format tags.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub(crate) enum RisTag {
    /// TY - Type of reference
    Type,
    /// TI - Primary title
    Title,
    /// T1 - Primary title (alternative)
    TitleAlternative,
    /// AU - Author
    Author,
    /// A1 - Primary author
    AuthorPrimary,
    /// JF - Journal/Periodical name: full format
    JournalFull,
    /// JO - Journal/Periodical name: full format (alternative)
    JournalFullAlternative,
    /// T2 - Secondary title (journal title alternative)
    SecondaryTitle,
    /// PY - Publication year
    PublicationYear,
    /// Y1 - Primary date
    DatePrimary,
    /// DO - DOI
    Doi,
    /// ID - Reference ID
    ReferenceId,
    /// AB - Abstract
    Abstract,
    /// N2 - Abstract (alternative)
    AbstractAlternative,
    /// KW - Keywords
    Keywords,
    /// ER - End of reference
    EndOfReference,
    /// Any other tag
    Unknown(String),
}

impl RisTag {
    /// Convert a string tag to a RisTag enum.
    pub(crate) fn from_tag(tag: &str) -> Self {
        match tag {
            "TY" => RisTag::Type,
            "TI" => RisTag::Title,
            "T1" => RisTag::TitleAlternative,
            "AU" => RisTag::Author,
            "A1" => RisTag::AuthorPrimary,
            "JF" => RisTag::JournalFull,
            "JO" => RisTag::JournalFullAlternative,
            "T2" => RisTag::SecondaryTitle,
            "PY" => RisTag::PublicationYear,
            "Y1" => RisTag::DatePrimary,
            "DO" => RisTag::Doi,
            "ID" => RisTag::ReferenceId,
            "AB" => RisTag::Abstract,
            "N2" => RisTag::AbstractAlternative,
            "KW" => RisTag::Keywords,
            "ER" => RisTag::EndOfReference,
            _ => RisTag::Unknown(tag.to_string()),
        }
    }

    /// Convert a RisTag enum back to its string representation.
    pub(crate) fn as_tag(&self) -> &str {
        match self {
            RisTag::Type => "TY",
            RisTag::Title => "TI",
            RisTag::TitleAlternative => "T1",
            RisTag::Author => "AU",
            RisTag::AuthorPrimary => "A1",
            RisTag::JournalFull => "JF",
            RisTag::JournalFullAlternative => "JO",
            RisTag::SecondaryTitle => "T2",
            RisTag::PublicationYear => "PY",
            RisTag::DatePrimary => "Y1",
            RisTag::Doi => "DO",
            RisTag::ReferenceId => "ID",
            RisTag::Abstract => "AB",
            RisTag::AbstractAlternative => "N2",
            RisTag::Keywords => "KW",
            RisTag::EndOfReference => "ER",
            RisTag::Unknown(tag) => tag,
        }
    }

    /// Get the priority of this tag for journal name selection.
    /// Lower numbers have higher priority.
    ///
    /// Priority order:
    /// 1. JF (Journal Full) - primary full journal name
    /// 2. T2 (Secondary Title) - alternative journal title
    /// 3. JO (Journal Full Alternative) - alternative full name
    pub(crate) fn journal_priority(&self) -> Option<u8> {
        match self {
            RisTag::JournalFull => Some(1),
            RisTag::SecondaryTitle => Some(2),
            RisTag::JournalFullAlternative => Some(3),
            _ => None,
        }
    }
}
