//! Retrieval of raw lookup responses.
//!
//! One best-effort request per source and identifier. Anything that goes
//! wrong (unsupported identifier kind, network, status, malformed body) is
//! logged and becomes [`Lookup::NotFound`]; the next source, or manual entry,
//! takes over from there.

mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::client::HttpClient;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockFetcher;
use crate::error::Result;
use async_trait::async_trait;
use futures::future::join_all;
use toshokan_extract::{Lookup, LookupId, Source};
use tracing::{instrument, warn};

/// Unified interface for asking the bibliographic sources about a book.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the raw response body of the lookup request for `id`.
    async fn get(&self, source: Source, id: &LookupId) -> Result<Vec<u8>>;

    /// Look `id` up in `source`. Never fails.
    #[instrument(skip(self), fields(%source, %id))]
    async fn fetch(&self, source: Source, id: &LookupId) -> Lookup {
        if !source.supports(id.kind()) {
            warn!("source does not support this kind of identifier");
            return Lookup::NotFound;
        }
        let raw = match self.get(source, id).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = ?err, "lookup failed, treating as not found");
                return Lookup::NotFound;
            },
        };
        match toshokan_extract::extract(source, &raw) {
            Ok(lookup) => lookup,
            Err(err) => {
                warn!(error = ?err, "unusable response, treating as not found");
                Lookup::NotFound
            },
        }
    }

    /// Look `id` up in every one of `sources`, keeping their order.
    async fn fetch_all(&self, sources: &[Source], id: &LookupId) -> Vec<(Source, Lookup)> {
        let lookups = join_all(sources.iter().map(|source| self.fetch(*source, id))).await;
        sources.iter().copied().zip(lookups).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_LIBRARY: &str = r#"{
        "ISBN:9780980200447": {
            "title": "Slow reading",
            "authors": [{"name": "John Miedema"}],
            "publishers": [{"name": "Litwin Books"}],
            "publish_date": "March 2009",
            "number_of_pages": 92
        }
    }"#;

    fn id() -> LookupId {
        "isbn:978-0-9802004-4-7".parse().unwrap()
    }

    #[tokio::test]
    async fn found_through_real_adapter() {
        let fetcher = MockFetcher::default().with_body(Source::OpenLibrary, OPEN_LIBRARY);
        let metadata = fetcher.fetch(Source::OpenLibrary, &id()).await.found().unwrap();
        assert_eq!(metadata.title, "Slow reading");
        assert_eq!(metadata.pages, 92);
        assert_eq!(fetcher.requests(), vec![(Source::OpenLibrary, "isbn:9780980200447".to_string())]);
    }

    #[tokio::test]
    async fn unsupported_kind_is_not_requested() {
        let fetcher = MockFetcher::default().with_body(Source::GoogleBooks, r#"{"totalItems": 1, "items": [{}]}"#);
        let id: LookupId = "lccn:2008054742".parse().unwrap();
        assert_eq!(fetcher.fetch(Source::GoogleBooks, &id).await, Lookup::NotFound);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn http_failure_is_not_found() {
        let fetcher = MockFetcher::default().with_status(Source::GoogleBooks, 503);
        assert_eq!(fetcher.fetch(Source::GoogleBooks, &id()).await, Lookup::NotFound);
    }

    #[tokio::test]
    async fn malformed_body_is_not_found() {
        let fetcher = MockFetcher::default().with_body(Source::GoogleBooks, "<html>rate limited</html>");
        assert_eq!(fetcher.fetch(Source::GoogleBooks, &id()).await, Lookup::NotFound);
    }

    #[tokio::test]
    async fn fetch_all_keeps_source_order() {
        let fetcher = MockFetcher::default()
            .with_body(Source::OpenLibrary, OPEN_LIBRARY)
            .with_body(Source::GoogleBooks, r#"{"kind": "books#volumes", "totalItems": 0}"#);
        let lookups = fetcher.fetch_all(&[Source::GoogleBooks, Source::OpenLibrary], &id()).await;
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[0], (Source::GoogleBooks, Lookup::NotFound));
        assert_eq!(lookups[1].0, Source::OpenLibrary);
        assert!(lookups[1].1.is_found());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
