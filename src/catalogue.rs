//! The add-a-book workflow: lookup, reconcile, build, shelve.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use toshokan_catalog::{Repository, VolumeId};
use toshokan_extract::{Book, BookId, Lookup, LookupId, Source};
use toshokan_lookup::Fetcher;
use toshokan_reconcile::{CatalogRecord, Reconciled, Resolver, build, reconcile_all};
use tracing::{debug, info, instrument};

/// The catalogued book, if any, carrying `id`.
pub async fn existing(repo: &Repository, id: &LookupId) -> Result<Option<Book>> {
    repo.find_by_identifier(id.identifier_kind(), id.value())
        .await
        .or_raise(|| ErrorKind::Catalog)
}

/// Ask every source about `id` and merge what they say.
#[instrument(skip(fetcher, resolver), fields(%id))]
pub async fn reconciled<F, R>(
    fetcher: &F,
    sources: &[Source],
    id: &LookupId,
    resolver: &mut R,
) -> Result<Option<Reconciled>>
where
    F: Fetcher + ?Sized,
    R: Resolver + ?Sized,
{
    let lookups = fetcher.fetch_all(sources, id).await;
    for (source, lookup) in &lookups {
        debug!(%source, found = lookup.is_found(), "lookup finished");
    }
    let reconciled = reconcile_all(lookups.into_iter().map(|(_, lookup)| lookup), resolver)
        .or_raise(|| ErrorKind::Reconcile)?;
    if let Some(reconciled) = &reconciled {
        for resolution in &reconciled.trace {
            info!(%resolution, "conflict resolved");
        }
    }
    Ok(reconciled)
}

/// [`reconciled`], turned into a record ready for persistence.
pub async fn record<F, R>(fetcher: &F, sources: &[Source], id: &LookupId, resolver: &mut R) -> Result<CatalogRecord>
where
    F: Fetcher + ?Sized,
    R: Resolver + ?Sized,
{
    let lookup = reconciled(fetcher, sources, id, resolver)
        .await?
        .map_or(Lookup::NotFound, Reconciled::into_lookup);
    Ok(build(lookup))
}

/// Store `book` if it is new, then add one volume of it, optionally kept in
/// the named library (created on first use).
#[instrument(skip_all, fields(title = %book.metadata().title))]
pub async fn shelve(repo: &Repository, book: &mut Book, library: Option<&str>) -> Result<(BookId, VolumeId)> {
    let book_id = match book.id() {
        Some(book_id) => book_id,
        None => repo.add_book(book).await.or_raise(|| ErrorKind::Catalog)?,
    };
    let volume_id = repo.create_volume(book_id).await.or_raise(|| ErrorKind::Catalog)?;
    if let Some(name) = library {
        let library_id = repo.add_library(name).await.or_raise(|| ErrorKind::Catalog)?.id();
        repo.assign_volume_to_library(volume_id, library_id)
            .await
            .or_raise(|| ErrorKind::Catalog)?;
    }
    info!(book_id, volume_id, "volume shelved");
    Ok((book_id, volume_id))
}
