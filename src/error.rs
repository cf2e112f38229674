//! CLI Error Types

use derive_more::{Display, Error};

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("catalog operation failed")]
    Catalog,
    #[display("could not set up the lookup client")]
    Lookup,
    #[display("could not reconcile the sources")]
    Reconcile,
    #[display("not a usable identifier")]
    Identifier,
    /// Input ended (or failed) in the middle of manual entry.
    #[display("input closed before the book was fully entered")]
    Input,
    #[display("no book with id {_0}")]
    NoSuchBook(#[error(not(source))] i64),
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Catalog)
    }
}
