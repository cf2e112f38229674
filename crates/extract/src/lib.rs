mod consts;
pub mod error;
pub mod models;
pub mod normalize;
mod source;

use tracing::instrument;

use crate::error::Result;
pub use crate::models::{Book, BookId, BookMetadata, IdentifierKind, Identifiers, Lookup};
pub use crate::normalize::{LookupId, LookupKind};
pub use crate::source::Source;

/// Easy, top-level entrypoint for turning a raw response body from `source`
/// into a [`Lookup`].
///
/// Accepts raw bytes, so the body can be handed over straight from the HTTP
/// client. See [`Source::extract`] for more details.
#[instrument(skip(raw), fields(%source, raw_size = raw.as_ref().len()))]
pub fn extract(source: Source, raw: impl AsRef<[u8]>) -> Result<Lookup> {
    source.extract(raw)
}
