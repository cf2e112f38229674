//! Identifier normalization.
//!
//! Canonicalizes an identifier typed by a user (or passed on the command-line)
//! before it is sent to any source. Each source expects its own casing for
//! the identifier type in the query (Open Library wants `ISBN:`, Google Books
//! wants `isbn:`), which [`LookupId::query_key`] takes care of.

use crate::consts::{LCCN_REGEX, OCLC_REGEX};
use crate::error::{Error, ErrorKind, Result};
use crate::models::IdentifierKind;
use crate::models::sanitize;
use crate::source::Source;
use exn::OptionExt;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::warn;

/// Identifier types a book can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// ISBN-10 or ISBN-13
    Isbn,
    Lccn,
    Oclc,
}
impl LookupKind {
    pub const ALL: [LookupKind; 3] = [Self::Isbn, Self::Lccn, Self::Oclc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isbn => "isbn",
            Self::Lccn => "lccn",
            Self::Oclc => "oclc",
        }
    }
}
impl FromStr for LookupKind {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "isbn" | "isbn10" | "isbn13" => Self::Isbn,
            "lccn" => Self::Lccn,
            "oclc" => Self::Oclc,
            _ => exn::bail!(ErrorKind::UnknownKind(s.to_string())),
        })
    }
}
impl Display for LookupKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A validated, canonical identifier ready to be sent to a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupId {
    kind: LookupKind,
    value: String,
}
impl LookupId {
    /// Validate `raw` as an identifier of `kind`.
    ///
    /// Whitespace and hyphens are stripped; ISBNs must be 10 or 13
    /// characters, OCLC numbers must be numeric, LCCNs must be an optional
    /// alphabetic prefix followed by digits.
    pub fn parse(kind: LookupKind, raw: &str) -> Result<Self> {
        let value = match kind {
            LookupKind::Isbn => isbn(raw)?,
            LookupKind::Lccn => lccn(raw)?,
            LookupKind::Oclc => oclc(raw)?,
        };
        Ok(Self { kind, value })
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The book record identifier this lookup identifier corresponds to.
    pub fn identifier_kind(&self) -> IdentifierKind {
        match self.kind {
            LookupKind::Isbn if self.value.len() == 10 => IdentifierKind::Isbn10,
            LookupKind::Isbn => IdentifierKind::Isbn13,
            LookupKind::Lccn => IdentifierKind::Lccn,
            LookupKind::Oclc => IdentifierKind::Oclc,
        }
    }

    /// Identifier type as spelled in `source`'s query syntax.
    pub fn query_key(&self, source: Source) -> &'static str {
        match (source, self.kind) {
            (Source::OpenLibrary, LookupKind::Isbn) => "ISBN",
            (Source::OpenLibrary, LookupKind::Lccn) => "LCCN",
            (Source::OpenLibrary, LookupKind::Oclc) => "OCLC",
            (Source::GoogleBooks, kind) => kind.as_str(),
        }
    }
}
impl FromStr for LookupId {
    type Err = Error;

    /// Parses `kind:value` (`isbn:9780980200447`). A bare value is treated
    /// as an ISBN, since that's what is printed on the back of most books.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((kind, value)) => Self::parse(kind.parse()?, value),
            None => Self::parse(LookupKind::Isbn, s),
        }
    }
}
impl Display for LookupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// Strip the punctuation people type into identifiers.
fn clean(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

fn malformed(kind: &'static str, raw: &str) -> ErrorKind {
    ErrorKind::MalformedIdentifier { kind, value: raw.to_string() }
}

pub(crate) fn isbn(raw: &str) -> Result<String> {
    let isbn = clean(raw).to_uppercase();
    let valid = match isbn.len() {
        10 => {
            let (body, check) = isbn.split_at(9);
            body.chars().all(|c| c.is_ascii_digit()) && check.chars().all(|c| c.is_ascii_digit() || c == 'X')
        },
        13 => isbn.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };
    if !valid {
        exn::bail!(malformed("isbn", raw));
    }
    if !isbn_checksum(&isbn) {
        // Misprinted ISBNs are real and still catalogued upstream. Look them up anyway.
        warn!(isbn = %isbn, "ISBN check digit does not match");
    }
    Ok(isbn)
}

/// Verify an already length/character-validated ISBN-10 or ISBN-13.
pub(crate) fn isbn_checksum(isbn: &str) -> bool {
    let digits = isbn.chars().map(|c| if c == 'X' { 10 } else { c.to_digit(10).unwrap_or(0) }).collect::<Vec<_>>();
    match digits.len() {
        10 => digits.iter().zip((1..=10).rev()).map(|(d, w)| d * w).sum::<u32>() % 11 == 0,
        13 => digits.iter().zip([1, 3].into_iter().cycle()).map(|(d, w)| d * w).sum::<u32>() % 10 == 0,
        _ => false,
    }
}

/// LCCNs are normalized as described by the Library of Congress: lowercase,
/// no whitespace, and a hyphenated serial is left-padded to six digits
/// (`85-2` becomes `85000002`).
pub(crate) fn lccn(raw: &str) -> Result<String> {
    let trimmed = raw.split_whitespace().collect::<String>().to_lowercase();
    let joined = match trimmed.split_once('-') {
        Some((prefix, serial)) if !serial.is_empty() && serial.chars().all(|c| c.is_ascii_digit()) => {
            format!("{prefix}{serial:0>6}")
        },
        Some(_) => exn::bail!(malformed("lccn", raw)),
        None => trimmed,
    };
    LCCN_REGEX.is_match(&joined).then_some(joined).ok_or_raise(|| malformed("lccn", raw))
}

pub(crate) fn oclc(raw: &str) -> Result<String> {
    let cleaned = clean(raw).to_lowercase();
    OCLC_REGEX
        .captures(&cleaned)
        .and_then(|captures| captures.get(1))
        .map(|number| number.as_str().trim_start_matches('0').to_string())
        .filter(|number| !number.is_empty())
        .ok_or_raise(|| malformed("oclc", raw))
}

pub(crate) fn issn(raw: &str) -> Result<String> {
    let issn = clean(raw).to_uppercase();
    let valid = issn.len() == 8 && {
        let (body, check) = issn.split_at(7);
        body.chars().all(|c| c.is_ascii_digit()) && check.chars().all(|c| c.is_ascii_digit() || c == 'X')
    };
    match valid {
        true => Ok(issn),
        false => exn::bail!(malformed("issn", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("9780980200447", "9780980200447")]
    #[case("978-0-9802004-4-7", "9780980200447")]
    #[case(" 1936117363 ", "1936117363")]
    #[case("0-8044-2957-x", "080442957X")]
    fn isbn_is_canonicalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(isbn(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("97809802004")]
    #[case("978098020044X")]
    #[case("X936117363")]
    #[case("not an isbn")]
    fn isbn_is_rejected(#[case] raw: &str) {
        let err = isbn(raw).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedIdentifier { kind: "isbn", .. }));
    }

    #[rstest]
    #[case("9780980200447", true)]
    #[case("9780980200448", false)]
    #[case("1936117363", true)]
    #[case("080442957X", true)]
    fn isbn_checksums(#[case] isbn: &str, #[case] expected: bool) {
        assert_eq!(isbn_checksum(isbn), expected);
    }

    #[rstest]
    #[case("2008054742", "2008054742")]
    #[case("85-2", "85000002")]
    #[case("n 78-890351", "n78890351")]
    #[case("  sn 85000678 ", "sn85000678")]
    fn lccn_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(lccn(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("abcd12345")]
    #[case("85-2a")]
    #[case("")]
    fn lccn_is_rejected(#[case] raw: &str) {
        assert!(lccn(raw).is_err());
    }

    #[rstest]
    #[case("297222669", "297222669")]
    #[case("ocm00012345", "12345")]
    #[case("(OCoLC)ocn297222669", "297222669")]
    fn oclc_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(oclc(raw).unwrap(), expected);
    }

    #[test]
    fn oclc_must_be_numeric() {
        assert!(oclc("twelve").is_err());
        assert!(oclc("000").is_err());
    }

    #[rstest]
    #[case("isbn:978-0-9802004-4-7", LookupKind::Isbn, "9780980200447", IdentifierKind::Isbn13)]
    #[case("1936117363", LookupKind::Isbn, "1936117363", IdentifierKind::Isbn10)]
    #[case("LCCN:2008054742", LookupKind::Lccn, "2008054742", IdentifierKind::Lccn)]
    #[case("oclc:297222669", LookupKind::Oclc, "297222669", IdentifierKind::Oclc)]
    fn lookup_id_from_str(
        #[case] input: &str,
        #[case] kind: LookupKind,
        #[case] value: &str,
        #[case] identifier: IdentifierKind,
    ) {
        let id = input.parse::<LookupId>().unwrap();
        assert_eq!(id.kind(), kind);
        assert_eq!(id.value(), value);
        assert_eq!(id.identifier_kind(), identifier);
    }

    #[test]
    fn lookup_id_unknown_kind() {
        let err = "olid:OL123M".parse::<LookupId>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownKind(_)));
    }

    #[rstest]
    #[case(Source::OpenLibrary, "ISBN")]
    #[case(Source::GoogleBooks, "isbn")]
    fn query_key_casing(#[case] source: Source, #[case] expected: &str) {
        let id = LookupId::parse(LookupKind::Isbn, "9780980200447").unwrap();
        assert_eq!(id.query_key(source), expected);
    }
}
