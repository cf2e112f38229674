//! Source adapters.
//!
//! Each adapter turns the raw JSON body returned by one bibliographic API
//! into a [`Lookup`]. Adapters are total over the record's field set: every
//! field the source leaves out is replaced with its
//! [sentinel](crate::models::sentinel) here, so reconciliation never has to
//! perform any defaulting itself.

mod googlebooks;
mod openlibrary;

use crate::consts::{GOOGLE_BOOKS_API, OPEN_LIBRARY_API};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Lookup, sanitize};
use crate::normalize::{LookupId, LookupKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// A bibliographic data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    OpenLibrary,
    GoogleBooks,
}
impl Source {
    pub const ALL: [Source; 2] = [Self::OpenLibrary, Self::GoogleBooks];

    /// Human-readable name, used in prompts and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenLibrary => "Open Library",
            Self::GoogleBooks => "Google Books",
        }
    }

    /// Short name, used in configuration.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::OpenLibrary => "openlibrary",
            Self::GoogleBooks => "googlebooks",
        }
    }

    /// Whether this source can be queried by identifiers of `kind`.
    ///
    /// Google Books accepts `lccn:` and `oclc:` query prefixes but never
    /// indexes either, so such queries always come back empty.
    pub fn supports(&self, kind: LookupKind) -> bool {
        match self {
            Self::OpenLibrary => matches!(kind, LookupKind::Isbn | LookupKind::Lccn | LookupKind::Oclc),
            Self::GoogleBooks => matches!(kind, LookupKind::Isbn),
        }
    }

    /// The URL of the lookup request for `id`.
    ///
    /// Identifiers are already normalized to digits (and the odd letter), so
    /// they are safe to interpolate without percent-encoding. Open Library
    /// does not understand percent-encoded bibkeys anyway.
    pub fn request_url(&self, id: &LookupId) -> String {
        match self {
            Self::OpenLibrary => format!(
                "{OPEN_LIBRARY_API}?bibkeys={}:{}&jscmd=data&format=json",
                id.query_key(*self),
                id.value()
            ),
            Self::GoogleBooks => format!("{GOOGLE_BOOKS_API}?q={}:{}", id.query_key(*self), id.value()),
        }
    }

    /// Convert a raw response body into a [`Lookup`].
    ///
    /// Only fails if the body is not JSON of the expected shape
    /// ([`ErrorKind::MalformedResponse`]); a well-formed response describing
    /// zero books is [`Lookup::NotFound`].
    pub fn extract(&self, raw: impl AsRef<[u8]>) -> Result<Lookup> {
        match self {
            Self::OpenLibrary => openlibrary::extract(raw.as_ref()),
            Self::GoogleBooks => googlebooks::extract(raw.as_ref()),
        }
    }
}
impl FromStr for Source {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "openlibrary" | "ol" => Self::OpenLibrary,
            "googlebooks" | "google" | "gb" => Self::GoogleBooks,
            _ => exn::bail!(ErrorKind::UnknownKind(s.to_string())),
        })
    }
}
impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Source {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(|e: Error| serde::de::Error::custom(&*e))
    }
}
#[cfg(feature = "serde")]
impl serde::Serialize for Source {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}
