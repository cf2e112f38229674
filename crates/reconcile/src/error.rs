//! Reconciliation Error Types
//!
//! Reconciling itself cannot fail: every conflict is resolved by asking the
//! [`Resolver`](crate::Resolver) again until it gives a usable answer. The
//! only way out is a resolver that can no longer answer at all.

use derive_more::{Display, Error};

/// A reconciliation error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resolver has no more answers to give (standard input closed, or a
    /// scripted resolver ran out of choices).
    #[display("resolution policy can no longer answer")]
    PolicyUnavailable,
    /// A resolution policy name was not recognised.
    #[display("unknown resolution policy: {_0}")]
    UnknownPolicy(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::PolicyUnavailable => false,
            Self::UnknownPolicy(_) => false,
        }
    }
}
