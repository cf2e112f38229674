mod book;
mod identifier;
mod lookup;
mod metadata;
pub mod sentinel;

pub use self::book::{Book, BookId};
pub use self::identifier::{IdentifierKind, Identifiers};
pub use self::lookup::Lookup;
pub use self::metadata::BookMetadata;

pub(crate) fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace('/', "").replace('-', "").replace('_', "").replace(' ', "")
}
