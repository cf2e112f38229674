use super::{BorrowerId, VolumeId};
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;
use toshokan_extract::BookId;

/// One copy of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: VolumeId,
    pub book_id: BookId,
    /// Name of the library the volume is kept in, if it has been assigned.
    pub library: Option<String>,
    /// Who has the volume right now, if anyone.
    pub borrowed_by: Option<BorrowerId>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VolumeRow {
    volume_id: i64,
    book_id: i64,
    library: Option<String>,
    borrowed_by: Option<i64>,
}

impl From<VolumeRow> for Volume {
    fn from(row: VolumeRow) -> Self {
        Self { id: row.volume_id, book_id: row.book_id, library: row.library, borrowed_by: row.borrowed_by }
    }
}

/// A volume currently lent out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrowing {
    pub volume_id: VolumeId,
    pub borrower_id: BorrowerId,
    pub borrower: String,
    pub contact: String,
    pub title: String,
    pub borrowed_at: UtcDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BorrowingRow {
    volume_id: i64,
    borrower_id: i64,
    name: String,
    contact: String,
    title: String,
    borrowed_at: i64,
}

impl TryFrom<BorrowingRow> for Borrowing {
    type Error = Error;
    fn try_from(row: BorrowingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            volume_id: row.volume_id,
            borrower_id: row.borrower_id,
            borrower: row.name,
            contact: row.contact,
            title: row.title,
            borrowed_at: UtcDateTime::from_unix_timestamp(row.borrowed_at)
                .or_raise(|| ErrorKind::InvalidData("borrowing date"))?,
        })
    }
}
