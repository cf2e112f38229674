use super::sanitize;
use super::sentinel::{NOT_AVAILABLE, is_unknown_identifier};
use crate::error::{Error, ErrorKind, Result};
use crate::normalize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The closed set of identifier kinds a book record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IdentifierKind {
    /// Library of Congress Control Number
    #[cfg_attr(feature = "serde", serde(rename = "lccn"))]
    Lccn,
    #[cfg_attr(feature = "serde", serde(rename = "isbn_13"))]
    Isbn13,
    #[cfg_attr(feature = "serde", serde(rename = "isbn_10"))]
    Isbn10,
    /// WorldCat (OCLC) control number
    #[cfg_attr(feature = "serde", serde(rename = "oclc"))]
    Oclc,
    /// Serials (magazines) use this.
    #[cfg_attr(feature = "serde", serde(rename = "issn"))]
    Issn,
}
impl IdentifierKind {
    pub const ALL: [IdentifierKind; 5] = [Self::Lccn, Self::Isbn13, Self::Isbn10, Self::Oclc, Self::Issn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lccn => "lccn",
            Self::Isbn13 => "isbn_13",
            Self::Isbn10 => "isbn_10",
            Self::Oclc => "oclc",
            Self::Issn => "issn",
        }
    }

    /// Validate and canonicalize a user-supplied value for this kind.
    ///
    /// Used at the input boundary (manual entry); anything rejected here is
    /// re-prompted and never reaches reconciliation.
    pub fn parse_value(&self, raw: &str) -> Result<String> {
        match self {
            Self::Isbn13 => normalize::isbn(raw).and_then(|isbn| match isbn.len() {
                13 => Ok(isbn),
                _ => exn::bail!(ErrorKind::MalformedIdentifier {
                    kind: self.as_str(),
                    value: raw.to_string()
                }),
            }),
            Self::Isbn10 => normalize::isbn(raw).and_then(|isbn| match isbn.len() {
                10 => Ok(isbn),
                _ => exn::bail!(ErrorKind::MalformedIdentifier {
                    kind: self.as_str(),
                    value: raw.to_string()
                }),
            }),
            Self::Lccn => normalize::lccn(raw),
            Self::Oclc => normalize::oclc(raw),
            Self::Issn => normalize::issn(raw),
        }
    }
}
impl FromStr for IdentifierKind {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "lccn" => Self::Lccn,
            "isbn13" => Self::Isbn13,
            "isbn10" => Self::Isbn10,
            "oclc" => Self::Oclc,
            "issn" => Self::Issn,
            _ => exn::bail!(ErrorKind::UnknownKind(s.to_string())),
        })
    }
}
impl Display for IdentifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier values for every [`IdentifierKind`].
///
/// The map is total: constructing one fills every kind with
/// [`NOT_AVAILABLE`], so a record can never be missing a key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifiers(BTreeMap<IdentifierKind, String>);

impl Default for Identifiers {
    fn default() -> Self {
        Self(IdentifierKind::ALL.into_iter().map(|kind| (kind, NOT_AVAILABLE.to_string())).collect())
    }
}
impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, kind: IdentifierKind, value: impl Into<String>) -> Self {
        self.set(kind, value);
        self
    }

    /// Set the value for `kind`. Blank values are stored as the sentinel.
    pub fn set(&mut self, kind: IdentifierKind, value: impl Into<String>) {
        let value = value.into();
        let value = match is_unknown_identifier(&value) {
            true => NOT_AVAILABLE.to_string(),
            false => value.trim().to_string(),
        };
        self.0.insert(kind, value);
    }

    pub fn get(&self, kind: IdentifierKind) -> &str {
        self.0.get(&kind).map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_known(&self, kind: IdentifierKind) -> bool {
        !is_unknown_identifier(self.get(kind))
    }

    /// Every kind in [`IdentifierKind::ALL`] order, sentinels included.
    pub fn iter(&self) -> impl Iterator<Item = (IdentifierKind, &str)> {
        self.0.iter().map(|(kind, value)| (*kind, value.as_str()))
    }

    /// Only the kinds that carry a real value.
    pub fn known(&self) -> impl Iterator<Item = (IdentifierKind, &str)> {
        self.iter().filter(|(_, value)| !is_unknown_identifier(value))
    }
}
impl FromIterator<(IdentifierKind, String)> for Identifiers {
    fn from_iter<T: IntoIterator<Item = (IdentifierKind, String)>>(iter: T) -> Self {
        let mut identifiers = Self::default();
        for (kind, value) in iter {
            identifiers.set(kind, value);
        }
        identifiers
    }
}
