//! Open Library adapter (`/api/books?jscmd=data`).
//!
//! The response is an object keyed by the bibkey that was asked for:
//! `{"ISBN:9780980200447": {...}}`. An empty object means the book isn't
//! catalogued. Open Library's JSON is inconsistent from record to record, so
//! most fields have a fallback before resorting to the sentinel.

use crate::consts::PAGINATION_REGEX;
use crate::error::{ErrorKind, Result};
use crate::models::sentinel::{NOT_AVAILABLE, UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES, UNTITLED};
use crate::models::{BookMetadata, IdentifierKind, Identifiers, Lookup};
use exn::ResultExt;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

const SOURCE: &str = "openlibrary";

#[derive(Debug, Deserialize)]
struct Record {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<Named>,
    by_statement: Option<String>,
    #[serde(default)]
    publishers: Vec<Named>,
    publish_date: Option<String>,
    #[serde(default)]
    identifiers: HashMap<String, Vec<String>>,
    number_of_pages: Option<i64>,
    pagination: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[instrument(skip(raw), fields(raw_size = raw.len()))]
pub(super) fn extract(raw: &[u8]) -> Result<Lookup> {
    let response: BTreeMap<String, Record> =
        serde_json::from_slice(raw).or_raise(|| ErrorKind::MalformedResponse(SOURCE))?;
    if response.len() > 1 {
        // Only happens if more than one bibkey was asked for. There's no
        // ordering guarantee upstream so take the first one we see.
        warn!(candidates = response.len(), "ambiguous result, continuing with the first candidate");
    }
    let Some((bibkey, record)) = response.into_iter().next() else {
        warn!("book not found on Open Library");
        return Ok(Lookup::NotFound);
    };
    debug!(%bibkey, "found record");
    Ok(Lookup::Found(record.into_metadata()))
}

impl Record {
    fn into_metadata(self) -> BookMetadata {
        let title = self.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| {
            debug!(source = SOURCE, field = "title", "substituting sentinel");
            UNTITLED.to_string()
        });
        let authors = match (self.authors.is_empty(), self.by_statement) {
            (false, _) => self.authors.into_iter().map(|a| a.name).collect(),
            (true, Some(by_statement)) if !by_statement.trim().is_empty() => {
                debug!(source = SOURCE, field = "authors", "falling back to by_statement");
                vec![by_statement]
            },
            (true, _) => {
                debug!(source = SOURCE, field = "authors", "substituting sentinel");
                vec![UNKNOWN_AUTHOR.to_string()]
            },
        };
        let mut publishers = self.publishers.into_iter().map(|p| p.name).collect::<Vec<_>>();
        if publishers.is_empty() {
            debug!(source = SOURCE, field = "publishers", "substituting sentinel");
            publishers.push(UNKNOWN.to_string());
        }
        let publish_date = self.publish_date.unwrap_or_else(|| {
            debug!(source = SOURCE, field = "publish_date", "substituting sentinel");
            UNKNOWN.to_string()
        });
        let mut identifiers = Identifiers::new();
        for kind in IdentifierKind::ALL {
            // Values are lists upstream; some records carry several ISBNs for
            // the very same edition. Sanity-checking Open Library is out of
            // scope, so the first one wins.
            match self.identifiers.get(kind.as_str()).and_then(|values| values.first()) {
                Some(value) => identifiers.set(kind, value.clone()),
                None => {
                    debug!(source = SOURCE, field = kind.as_str(), "substituting sentinel");
                    identifiers.set(kind, NOT_AVAILABLE);
                },
            }
        }
        let pages = self.number_of_pages.or_else(|| self.pagination.as_deref().and_then(pages_from_pagination));
        let pages = pages.unwrap_or_else(|| {
            debug!(source = SOURCE, field = "pages", "substituting sentinel");
            UNKNOWN_PAGES
        });
        BookMetadata { title, authors, publishers, publish_date, pages, identifiers }.normalized()
    }
}

/// Free-text pagination (`"xii, 318 p."`) may hold several numbers; the
/// largest one is the best guess at the page count.
fn pages_from_pagination(pagination: &str) -> Option<i64> {
    PAGINATION_REGEX.find_iter(pagination).filter_map(|m| m.as_str().parse::<i64>().ok()).max()
}
