//! Two-way (and fold-to-many) reconciliation of [`BookMetadata`].
//!
//! For every scalar field: equal values are kept, a sentinel loses to real
//! data, two sentinels are a match, and two different real values are a
//! conflict handed to the [`Resolver`]. Authors go through
//! [`dedupe`](crate::dedupe) and identifiers through
//! [`merge_identifiers`](crate::merge_identifiers).

use crate::error::Result;
use crate::resolver::Resolver;
use crate::trace::{Field, Resolution};
use toshokan_extract::models::sentinel::{
    is_unknown_authors, is_unknown_date, is_unknown_pages, is_unknown_publishers, is_unknown_title,
};
use toshokan_extract::{BookMetadata, Lookup};
use tracing::{debug, instrument, warn};

/// The merged record plus every decision the resolver made along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub metadata: BookMetadata,
    pub trace: Vec<Resolution>,
}

impl Reconciled {
    /// A record that needed no reconciling at all.
    pub fn unchanged(metadata: BookMetadata) -> Self {
        Self { metadata, trace: Vec::new() }
    }

    /// Returns `true` if the resolver was never needed.
    pub fn is_clean(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn into_lookup(self) -> Lookup {
        Lookup::Found(self.metadata)
    }
}

/// Holds the resolver and collects the trace for a single reconciliation.
pub(crate) struct Session<'r, R: ?Sized> {
    resolver: &'r mut R,
    pub(crate) trace: Vec<Resolution>,
}

impl<'r, R: Resolver + ?Sized> Session<'r, R> {
    pub(crate) fn new(resolver: &'r mut R) -> Self {
        Self { resolver, trace: Vec::new() }
    }

    /// Ask the resolver until it names one of `options`; returns the 0-based
    /// index of the choice.
    pub(crate) fn resolve(&mut self, field: Field, options: Vec<String>) -> Result<usize> {
        let prompt = format!("Conflicting {field} found. Which is to be kept?");
        let choice = loop {
            let choice = self.resolver.choose(&prompt, &options)?;
            if (1..=options.len()).contains(&choice) {
                break choice - 1;
            }
            warn!(%field, choice, options = options.len(), "resolver returned an out-of-range choice, asking again");
        };
        debug!(%field, chosen = %options[choice], "conflict resolved");
        self.trace.push(Resolution { field, options, choice });
        Ok(choice)
    }

    /// The generic rule for a single field.
    pub(crate) fn scalar<T: PartialEq>(
        &mut self,
        field: Field,
        a: T,
        b: T,
        unknown: impl Fn(&T) -> bool,
        show: impl Fn(&T) -> String,
    ) -> Result<T> {
        if a == b {
            return Ok(a);
        }
        Ok(match (unknown(&a), unknown(&b)) {
            // Two sentinels ("Untitled" vs "UNKNOWN") mean the same thing.
            (true, true) => a,
            (true, false) => b,
            (false, true) => a,
            (false, false) => match self.resolve(field, vec![show(&a), show(&b)])? {
                0 => a,
                _ => b,
            },
        })
    }

    fn metadata(&mut self, a: BookMetadata, b: BookMetadata) -> Result<BookMetadata> {
        let title = self.scalar(Field::Title, a.title, b.title, |t| is_unknown_title(t), String::clone)?;
        let authors = self.authors(a.authors, b.authors)?;
        let publishers = self.scalar(
            Field::Publishers,
            a.publishers,
            b.publishers,
            |p| is_unknown_publishers(p),
            |p| p.join("; "),
        )?;
        let publish_date = self.scalar(
            Field::PublishDate,
            a.publish_date,
            b.publish_date,
            |d| is_unknown_date(d),
            String::clone,
        )?;
        let pages = self.scalar(Field::Pages, a.pages, b.pages, |p| is_unknown_pages(*p), i64::to_string)?;
        let identifiers = self.identifiers(&a.identifiers, &b.identifiers)?;
        Ok(BookMetadata { title, authors, publishers, publish_date, pages, identifiers })
    }

    fn authors(&mut self, a: Vec<String>, b: Vec<String>) -> Result<Vec<String>> {
        let (a_unknown, b_unknown) = (is_unknown_authors(&a), is_unknown_authors(&b));
        if a_unknown && b_unknown {
            return Ok(a);
        }
        let combined = [(a, a_unknown), (b, b_unknown)]
            .into_iter()
            .filter(|(_, unknown)| !unknown)
            .flat_map(|(names, _)| names)
            .collect::<Vec<_>>();
        self.dedupe(&combined)
    }
}

/// Reconcile two records describing the same book.
///
/// Pointwise identical inputs are returned as they are, without ever
/// consulting the resolver.
#[instrument(skip_all, fields(a = %a.title, b = %b.title))]
pub fn reconcile<R: Resolver + ?Sized>(a: BookMetadata, b: BookMetadata, resolver: &mut R) -> Result<Reconciled> {
    if a == b {
        debug!("records are identical");
        return Ok(Reconciled::unchanged(a));
    }
    let mut session = Session::new(resolver);
    let metadata = session.metadata(a, b)?;
    debug!(conflicts = session.trace.len(), "records reconciled");
    Ok(Reconciled { metadata, trace: session.trace })
}

/// [`reconcile`] two lookup outcomes. A missing side yields the other one
/// unchanged; `None` when neither source found the book.
pub fn reconcile_lookups<R: Resolver + ?Sized>(a: Lookup, b: Lookup, resolver: &mut R) -> Result<Option<Reconciled>> {
    Ok(match (a, b) {
        (Lookup::Found(a), Lookup::Found(b)) => Some(reconcile(a, b, resolver)?),
        (Lookup::Found(found), Lookup::NotFound) | (Lookup::NotFound, Lookup::Found(found)) => {
            Some(Reconciled::unchanged(found))
        },
        (Lookup::NotFound, Lookup::NotFound) => None,
    })
}

/// Fold any number of lookup outcomes, left to right. The trace of every
/// step is kept, in order.
#[instrument(skip_all)]
pub fn reconcile_all<R: Resolver + ?Sized>(
    lookups: impl IntoIterator<Item = Lookup>,
    resolver: &mut R,
) -> Result<Option<Reconciled>> {
    let mut merged: Option<Reconciled> = None;
    for lookup in lookups {
        merged = match (merged, lookup) {
            (None, lookup) => lookup.found().map(Reconciled::unchanged),
            (Some(done), Lookup::NotFound) => Some(done),
            (Some(done), Lookup::Found(next)) => {
                let step = reconcile(done.metadata, next, resolver)?;
                let mut trace = done.trace;
                trace.extend(step.trace);
                Some(Reconciled { metadata: step.metadata, trace })
            },
        };
    }
    if merged.is_none() {
        warn!("no source found the book");
    }
    Ok(merged)
}
