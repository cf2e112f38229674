use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use toshokan_extract::models::sentinel::{UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES};
use toshokan_extract::{Book, BookMetadata, IdentifierKind, Identifiers};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookRow {
    pub(crate) book_id: i64,
    pub(crate) title: String,
    pub(crate) publish_date: String,
    pub(crate) pages: Option<i64>,
}

impl BookRow {
    /// Reassemble a [`Book`] from its row and its relations. Relations that
    /// were never linked come back as their sentinels.
    pub(crate) fn into_book(
        self,
        authors: Vec<String>,
        publishers: Vec<String>,
        identifiers: Vec<IdentifierRow>,
    ) -> Result<Book, Error> {
        let identifiers = identifiers
            .into_iter()
            .map(|row| {
                let kind = row.kind.parse::<IdentifierKind>().or_raise(|| ErrorKind::InvalidData("identifier kind"))?;
                Ok((kind, row.value))
            })
            .collect::<Result<Identifiers, Error>>()?;
        let metadata = BookMetadata {
            title: self.title,
            authors: match authors.is_empty() {
                true => vec![UNKNOWN_AUTHOR.to_string()],
                false => authors,
            },
            publishers: match publishers.is_empty() {
                true => vec![UNKNOWN.to_string()],
                false => publishers,
            },
            publish_date: self.publish_date,
            pages: self.pages.unwrap_or(UNKNOWN_PAGES),
            identifiers,
        };
        Ok(Book::with_id(self.book_id, metadata.normalized()))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct IdentifierRow {
    pub(crate) kind: String,
    pub(crate) value: String,
}
