use super::{BookMetadata, Identifiers};
use crate::error::{ErrorKind, Result};

/// Row identity assigned by the persistence layer.
pub type BookId = i64;

/// A catalogued book: reconciled (or manually entered) metadata plus the
/// identity the database gave it.
///
/// The identity is unset until the book is stored and read-only afterwards.
/// Identifiers can only change through [`update_identifiers`](Self::update_identifiers);
/// the rest of the record is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Book {
    #[cfg_attr(feature = "serde", serde(rename = "book_id"))]
    id: Option<BookId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    metadata: BookMetadata,
}
impl AsRef<BookMetadata> for Book {
    fn as_ref(&self) -> &BookMetadata {
        &self.metadata
    }
}
impl From<BookMetadata> for Book {
    fn from(metadata: BookMetadata) -> Self {
        Self::new(metadata)
    }
}
impl Book {
    /// A book that has not been persisted yet.
    pub fn new(metadata: BookMetadata) -> Self {
        Self { id: None, metadata }
    }

    /// A book read back from storage.
    pub fn with_id(id: BookId, metadata: BookMetadata) -> Self {
        Self { id: Some(id), metadata }
    }

    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Record the identity the database assigned on insertion.
    ///
    /// Fails with [`ErrorKind::IdentityAssigned`] if the book already has one.
    pub fn assign_id(&mut self, id: BookId) -> Result<()> {
        if let Some(existing) = self.id {
            exn::bail!(ErrorKind::IdentityAssigned(existing));
        }
        self.id = Some(id);
        Ok(())
    }

    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    pub fn into_metadata(self) -> BookMetadata {
        self.metadata
    }

    pub fn identifiers(&self) -> &Identifiers {
        &self.metadata.identifiers
    }

    /// Replace the identifiers, returning the previous set.
    pub fn update_identifiers(&mut self, identifiers: Identifiers) -> Identifiers {
        std::mem::replace(&mut self.metadata.identifiers, identifiers)
    }
}
