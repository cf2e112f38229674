//! Google Books adapter (`/books/v1/volumes?q=`).
//!
//! Google Books answers a search, not a lookup: the response lists
//! `totalItems` and the matching `items`. For an identifier search there
//! should only ever be one. The volume JSON never carries LCCN or OCLC
//! numbers (despite both being valid query prefixes), so those identifiers
//! are always the sentinel from this source.

use crate::error::{ErrorKind, Result};
use crate::models::sentinel::{NOT_AVAILABLE, UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES, UNTITLED};
use crate::models::{BookMetadata, IdentifierKind, Identifiers, Lookup};
use exn::ResultExt;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

const SOURCE: &str = "googlebooks";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    page_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[instrument(skip(raw), fields(raw_size = raw.len()))]
pub(super) fn extract(raw: &[u8]) -> Result<Lookup> {
    let response: Response = serde_json::from_slice(raw).or_raise(|| ErrorKind::MalformedResponse(SOURCE))?;
    if response.total_items > 1 || response.items.len() > 1 {
        warn!(candidates = response.total_items, "ambiguous result, continuing with the first candidate");
    }
    let Some(item) = response.items.into_iter().next() else {
        warn!("book not found on Google Books");
        return Ok(Lookup::NotFound);
    };
    Ok(Lookup::Found(item.volume_info.into_metadata()))
}

impl VolumeInfo {
    fn into_metadata(self) -> BookMetadata {
        let title = self.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| {
            debug!(source = SOURCE, field = "title", "substituting sentinel");
            UNTITLED.to_string()
        });
        let authors = match self.authors.is_empty() {
            false => self.authors,
            true => {
                debug!(source = SOURCE, field = "authors", "substituting sentinel");
                vec![UNKNOWN_AUTHOR.to_string()]
            },
        };
        // Google assumes a single publisher; stored as a list to keep the
        // record shape consistent with every other source.
        let publishers = vec![self.publisher.unwrap_or_else(|| {
            debug!(source = SOURCE, field = "publishers", "substituting sentinel");
            UNKNOWN.to_string()
        })];
        let publish_date = self.published_date.unwrap_or_else(|| {
            debug!(source = SOURCE, field = "publish_date", "substituting sentinel");
            UNKNOWN.to_string()
        });
        let mut identifiers = Identifiers::new();
        for industry in self.industry_identifiers {
            let kind = match industry.kind.as_str() {
                "ISBN_13" => IdentifierKind::Isbn13,
                "ISBN_10" => IdentifierKind::Isbn10,
                "ISSN" => IdentifierKind::Issn,
                // `OTHER` identifiers are source-specific (`UOM:39015...`).
                other => {
                    debug!(source = SOURCE, kind = other, "ignoring identifier");
                    continue;
                },
            };
            identifiers.set(kind, industry.identifier);
        }
        if identifiers.known().next().is_none() {
            warn!("book has no industry-standard identifiers");
        }
        debug_assert_eq!(identifiers.get(IdentifierKind::Lccn), NOT_AVAILABLE);
        let pages = self.page_count.unwrap_or_else(|| {
            debug!(source = SOURCE, field = "pages", "substituting sentinel");
            UNKNOWN_PAGES
        });
        BookMetadata { title, authors, publishers, publish_date, pages, identifiers }.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOW_READING: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 1,
        "items": [{
            "kind": "books#volume",
            "id": "Yp2bPgAACAAJ",
            "volumeInfo": {
                "title": "Slow Reading",
                "authors": ["John Miedema"],
                "publisher": "Litwin Books, LLC",
                "publishedDate": "2009",
                "industryIdentifiers": [
                    {"type": "ISBN_10", "identifier": "0980200442"},
                    {"type": "ISBN_13", "identifier": "9780980200447"},
                    {"type": "OTHER", "identifier": "UOM:39015080768631"}
                ],
                "pageCount": 92
            }
        }]
    }"#;

    #[test]
    fn extracts_full_record() {
        let metadata = extract(SLOW_READING.as_bytes()).unwrap().found().unwrap();
        assert_eq!(metadata.title, "Slow Reading");
        assert_eq!(metadata.authors, vec!["John Miedema"]);
        assert_eq!(metadata.publishers, vec!["Litwin Books, LLC"]);
        assert_eq!(metadata.publish_date, "2009");
        assert_eq!(metadata.pages, 92);
        assert_eq!(metadata.identifiers.get(IdentifierKind::Isbn13), "9780980200447");
        assert_eq!(metadata.identifiers.get(IdentifierKind::Isbn10), "0980200442");
    }

    #[test]
    fn lccn_and_oclc_are_never_populated() {
        let metadata = extract(SLOW_READING.as_bytes()).unwrap().found().unwrap();
        assert_eq!(metadata.identifiers.get(IdentifierKind::Lccn), NOT_AVAILABLE);
        assert_eq!(metadata.identifiers.get(IdentifierKind::Oclc), NOT_AVAILABLE);
    }

    #[test]
    fn zero_items_is_not_found() {
        let lookup = extract(br#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert_eq!(lookup, Lookup::NotFound);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = extract(br#"{"items": "nope"}"#).unwrap_err();
        assert_eq!(*err, ErrorKind::MalformedResponse(SOURCE));
    }

    #[test]
    fn missing_fields_become_sentinels() {
        let metadata = extract(br#"{"totalItems": 1, "items": [{"volumeInfo": {}}]}"#).unwrap().found().unwrap();
        assert_eq!(metadata.title, UNTITLED);
        assert_eq!(metadata.authors, vec![UNKNOWN_AUTHOR]);
        assert_eq!(metadata.publishers, vec![UNKNOWN]);
        assert_eq!(metadata.publish_date, UNKNOWN);
        assert_eq!(metadata.pages, UNKNOWN_PAGES);
        assert_eq!(metadata.identifiers, Identifiers::default());
    }

    #[test]
    fn ambiguous_response_takes_first_candidate() {
        let raw = br#"{"totalItems": 2, "items": [
            {"volumeInfo": {"title": "First"}},
            {"volumeInfo": {"title": "Second"}}
        ]}"#;
        let metadata = extract(raw).unwrap().found().unwrap();
        assert_eq!(metadata.title, "First");
    }
}
