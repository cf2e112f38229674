//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source response is not the JSON document the adapter expects.
    #[display("malformed response from {_0}")]
    MalformedResponse(#[error(not(source))] &'static str),
    /// An identifier typed by the user (or passed on the command-line) is
    /// not valid for its kind. Ask again.
    #[display("malformed {kind} identifier: {value}")]
    MalformedIdentifier {
        /// The identifier kind that was expected.
        kind: &'static str,
        /// The raw value that was rejected.
        value: String,
    },
    /// An identifier kind or lookup kind name was not recognised.
    #[display("unknown identifier kind: {_0}")]
    UnknownKind(#[error(not(source))] String),
    /// The persistence layer tried to assign an identity to a book that
    /// already has one.
    #[display("book already has identity {_0}")]
    IdentityAssigned(#[error(not(source))] i64),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Nothing in this crate touches the network; the same input will
        // always produce the same error.
        false
    }
}
