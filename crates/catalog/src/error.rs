//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    /// The directory for the database file could not be created.
    #[display("cannot create database directory {_0}")]
    Location(#[error(not(source))] String),
    #[display("database migration error")]
    Migration,
    /// A referenced entity does not exist.
    #[display("{_0} not found")]
    NotFound(#[error(not(source))] &'static str),
    /// The book has already been stored and carries its identity.
    #[display("book has already been stored as #{_0}")]
    AlreadyStored(#[error(not(source))] i64),
    /// The volume is lent out; it has to be returned first.
    #[display("volume #{_0} is already borrowed")]
    AlreadyBorrowed(#[error(not(source))] i64),
    /// There is no matching borrowing to end.
    #[display("volume #{_0} is not borrowed by that borrower")]
    NotBorrowed(#[error(not(source))] i64),
    /// Stored data could not be converted back into a model.
    #[display("invalid catalog data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // SQLITE_BUSY surfaces as a plain database error.
        matches!(self, Self::Database)
    }
}
