use super::BookMetadata;

/// Outcome of asking one source about one identifier.
///
/// `NotFound` is an explicit "no result" state. It is not the same as a
/// [`BookMetadata`] full of sentinels: a found record with no data still
/// says the source knows the book exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(BookMetadata),
    NotFound,
}
impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<BookMetadata> {
        match self {
            Self::Found(metadata) => Some(metadata),
            Self::NotFound => None,
        }
    }
}
impl From<Option<BookMetadata>> for Lookup {
    fn from(metadata: Option<BookMetadata>) -> Self {
        metadata.map_or(Self::NotFound, Self::Found)
    }
}
impl From<BookMetadata> for Lookup {
    fn from(metadata: BookMetadata) -> Self {
        Self::Found(metadata)
    }
}
