use toshokan_extract::{Book, Lookup};
use tracing::debug;

/// What to do with the outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRecord {
    /// A book ready for persistence; no identity has been assigned yet.
    Ready(Book),
    /// None of the sources knew the book. Never fabricate a record; ask the
    /// user for the details instead.
    NeedsManualEntry,
}

impl CatalogRecord {
    pub fn book(self) -> Option<Book> {
        match self {
            Self::Ready(book) => Some(book),
            Self::NeedsManualEntry => None,
        }
    }
}

impl From<Lookup> for CatalogRecord {
    fn from(lookup: Lookup) -> Self {
        build(lookup)
    }
}

pub fn build(lookup: Lookup) -> CatalogRecord {
    match lookup {
        Lookup::Found(metadata) => CatalogRecord::Ready(Book::new(metadata)),
        Lookup::NotFound => {
            debug!("book needs manual entry");
            CatalogRecord::NeedsManualEntry
        },
    }
}
