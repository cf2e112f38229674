//! Lookup Error Types
//!
//! None of these ever reach the reconciliation engine: a failed lookup is
//! logged and treated as [`Lookup::NotFound`](toshokan_extract::Lookup).

use derive_more::{Display, Error};

/// A lookup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be built (bad user agent, TLS backend).
    #[display("could not build HTTP client")]
    Client,
    /// The request never got a response (DNS, connection, timeout).
    #[display("request to {_0} failed")]
    Request(#[error(not(source))] &'static str),
    /// The source answered with a non-success status.
    #[display("{api} responded with HTTP {status}")]
    Status { api: &'static str, status: u16 },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Client => false,
            Self::Request(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}
