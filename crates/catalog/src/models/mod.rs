mod book;
mod lending;

pub(crate) use self::book::{BookRow, IdentifierRow};
pub use self::lending::{Borrowing, Volume};
pub(crate) use self::lending::{BorrowingRow, VolumeRow};

pub type VolumeId = i64;
pub type LibraryId = i64;
pub type BorrowerId = i64;

/// Result of inserting an entity identified by a natural key (author name,
/// publisher name, library name, borrower contact).
///
/// Finding the key already taken is not an error; the existing row is
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyed {
    Created(i64),
    Existing(i64),
}

impl Keyed {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created(id) | Self::Existing(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
