//! SQLite catalog of the personal library.
//!
//! Unlike the lookup sources, this database *is* the source of truth: it
//! holds every book that has been catalogued, the physical volumes of each
//! book, which library each volume is kept in and who has borrowed what.
//!
//! # Architecture
//! - **Books** carry their title, date and page count; authors and
//!   publishers are shared entities linked in order, identifiers are stored
//!   per kind (sentinels are never stored).
//! - **Volumes** are copies of a book. A volume belongs to at most one
//!   library (its collection) and has at most one active borrowing.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{BorrowerId, Borrowing, Keyed, LibraryId, Volume, VolumeId};
pub use crate::repo::Repository;
