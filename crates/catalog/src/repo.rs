//! Repository for books and everything hanging off them.
//!
//! Books own their author, publisher and identifier relations. Volumes are
//! physical copies of a book; a volume sits in at most one library and is
//! lent to at most one borrower at a time. Both rules are enforced by unique
//! constraints and reported as structured errors.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{BorrowerId, LibraryId, VolumeId};
use crate::models::{BookRow, Borrowing, BorrowingRow, IdentifierRow, Keyed, Volume, VolumeRow};
use exn::{OptionExt, ResultExt};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use time::UtcDateTime;
use toshokan_extract::models::sentinel::{is_unknown_authors, is_unknown_publishers};
use toshokan_extract::{Book, BookId, BookMetadata, IdentifierKind, Identifiers};
use tracing::{debug, instrument};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(e) if e.is_foreign_key_violation())
}

/// Repository for the catalog database.
///
/// A `dry_run` repository runs every write inside a transaction that is
/// rolled back instead of committed: constraints are still checked and ids
/// are still handed out, but nothing is kept.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    dry_run: bool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), dry_run: false }
    }
}
impl Repository {
    pub fn new(pool: SqlitePool, dry_run: bool) -> Self {
        Self { pool, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await.or_raise(|| ErrorKind::Database)
    }

    async fn finish(&self, tx: Transaction<'static, Sqlite>) -> Result<()> {
        match self.dry_run {
            true => tx.rollback().await.or_raise(|| ErrorKind::Database),
            false => tx.commit().await.or_raise(|| ErrorKind::Database),
        }
    }

    // =========================================================================
    // Books
    // =========================================================================

    /// Store a book row and its identifiers, without any authors or
    /// publishers. Returns the new book id; the `Book` itself is left alone.
    #[instrument(skip_all, fields(title = %book.metadata().title))]
    pub async fn store(&self, book: &Book) -> Result<BookId> {
        if let Some(id) = book.id() {
            exn::bail!(ErrorKind::AlreadyStored(id));
        }
        let mut tx = self.begin().await?;
        let id = Self::insert_book(&mut tx, book.metadata()).await?;
        self.finish(tx).await?;
        Ok(id)
    }

    /// Store a book with all of its relations in one transaction and assign
    /// the new id to it.
    ///
    /// Sentinel author and publisher lists are not linked. In dry-run mode
    /// the id is returned but not assigned, since it was never kept.
    #[instrument(skip_all, fields(title = %book.metadata().title))]
    pub async fn add_book(&self, book: &mut Book) -> Result<BookId> {
        if let Some(id) = book.id() {
            exn::bail!(ErrorKind::AlreadyStored(id));
        }
        let metadata = book.metadata();
        let mut tx = self.begin().await?;
        let id = Self::insert_book(&mut tx, metadata).await?;
        if !is_unknown_authors(&metadata.authors) {
            for name in &metadata.authors {
                let author = Self::upsert_author(&mut tx, name).await?;
                Self::link(&mut tx, include_str!("../queries/link_author.sql"), author.id(), id).await?;
            }
        }
        if !is_unknown_publishers(&metadata.publishers) {
            for name in &metadata.publishers {
                let publisher = Self::upsert_publisher(&mut tx, name).await?;
                Self::link(&mut tx, include_str!("../queries/link_publisher.sql"), publisher.id(), id).await?;
            }
        }
        self.finish(tx).await?;
        if !self.dry_run {
            book.assign_id(id).or_raise(|| ErrorKind::AlreadyStored(id))?;
        }
        debug!(book_id = id, "book added");
        Ok(id)
    }

    /// Link an author (created if the name is new) to a book, after any
    /// authors it already has.
    #[instrument(skip(self))]
    pub async fn link_author(&self, book_id: BookId, name: &str) -> Result<Keyed> {
        let mut tx = self.begin().await?;
        let author = Self::upsert_author(&mut tx, name).await?;
        Self::link(&mut tx, include_str!("../queries/link_author.sql"), author.id(), book_id).await?;
        self.finish(tx).await?;
        Ok(author)
    }

    /// Link a publisher (created if the name is new) to a book.
    #[instrument(skip(self))]
    pub async fn link_publisher(&self, book_id: BookId, name: &str) -> Result<Keyed> {
        let mut tx = self.begin().await?;
        let publisher = Self::upsert_publisher(&mut tx, name).await?;
        Self::link(&mut tx, include_str!("../queries/link_publisher.sql"), publisher.id(), book_id).await?;
        self.finish(tx).await?;
        Ok(publisher)
    }

    #[instrument(skip(self))]
    pub async fn get_book(&self, book_id: BookId) -> Result<Option<Book>> {
        let Some(row): Option<BookRow> = sqlx::query_as(include_str!("../queries/get_book.sql"))
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?
        else {
            return Ok(None);
        };
        let authors: Vec<String> = sqlx::query_scalar(include_str!("../queries/list_book_authors.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let publishers: Vec<String> = sqlx::query_scalar(include_str!("../queries/list_book_publishers.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let identifiers: Vec<IdentifierRow> = sqlx::query_as(include_str!("../queries/list_book_identifiers.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.into_book(authors, publishers, identifiers).map(Some)
    }

    /// Find a stored book by any of its identifiers. Sentinels never match.
    #[instrument(skip(self))]
    pub async fn find_by_identifier(&self, kind: IdentifierKind, value: &str) -> Result<Option<Book>> {
        let book_id: Option<i64> = sqlx::query_scalar(include_str!("../queries/find_by_identifier.sql"))
            .bind(kind.as_str())
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        match book_id {
            Some(book_id) => self.get_book(book_id).await,
            None => Ok(None),
        }
    }

    /// Replace the stored identifiers of an already stored book with the
    /// ones it carries now (see [`Book::update_identifiers`]).
    #[instrument(skip_all, fields(book_id = ?book.id()))]
    pub async fn update_identifiers(&self, book: &Book) -> Result<()> {
        let book_id = book.id().ok_or_raise(|| ErrorKind::NotFound("book"))?;
        let mut tx = self.begin().await?;
        let exists: Option<BookRow> = sqlx::query_as(include_str!("../queries/get_book.sql"))
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if exists.is_none() {
            exn::bail!(ErrorKind::NotFound("book"));
        }
        sqlx::query(include_str!("../queries/delete_identifiers.sql"))
            .bind(book_id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::insert_identifiers(&mut tx, book_id, book.identifiers()).await?;
        self.finish(tx).await
    }

    // =========================================================================
    // Volumes & Libraries
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn create_volume(&self, book_id: BookId) -> Result<VolumeId> {
        let mut tx = self.begin().await?;
        let volume_id: i64 = match sqlx::query_scalar(include_str!("../queries/insert_volume.sql"))
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await
        {
            Err(e) if is_foreign_key_violation(&e) => return Err(e).or_raise(|| ErrorKind::NotFound("book")),
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        self.finish(tx).await?;
        Ok(volume_id)
    }

    /// Every volume of a book, with the library each is kept in.
    #[instrument(skip(self))]
    pub async fn list_volumes(&self, book_id: BookId) -> Result<Vec<Volume>> {
        let rows: Vec<VolumeRow> = sqlx::query_as(include_str!("../queries/list_volumes.sql"))
            .bind(book_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Volume::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn add_library(&self, name: &str) -> Result<Keyed> {
        let mut tx = self.begin().await?;
        let library = Self::keyed(
            &mut tx,
            include_str!("../queries/insert_library.sql"),
            include_str!("../queries/get_library_id.sql"),
            name,
        )
        .await?;
        self.finish(tx).await?;
        Ok(library)
    }

    /// Put a volume in a library, moving it out of any library it was in.
    #[instrument(skip(self))]
    pub async fn assign_volume_to_library(&self, volume_id: VolumeId, library_id: LibraryId) -> Result<()> {
        let mut tx = self.begin().await?;
        match sqlx::query(include_str!("../queries/assign_volume.sql"))
            .bind(volume_id)
            .bind(library_id)
            .execute(&mut *tx)
            .await
        {
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(e).or_raise(|| ErrorKind::NotFound("volume or library"));
            },
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        self.finish(tx).await
    }

    // =========================================================================
    // Lending
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn add_borrower(&self, name: &str, contact: &str) -> Result<Keyed> {
        let mut tx = self.begin().await?;
        let inserted: Option<i64> = sqlx::query_scalar(include_str!("../queries/insert_borrower.sql"))
            .bind(name)
            .bind(contact)
            .fetch_optional(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let borrower = match inserted {
            Some(id) => Keyed::Created(id),
            None => {
                let id: i64 = sqlx::query_scalar(include_str!("../queries/get_borrower_id.sql"))
                    .bind(contact)
                    .fetch_one(&mut *tx)
                    .await
                    .or_raise(|| ErrorKind::Database)?;
                debug!(borrower_id = id, "contact already known, reusing borrower");
                Keyed::Existing(id)
            },
        };
        self.finish(tx).await?;
        Ok(borrower)
    }

    /// Lend a volume out. Fails with [`ErrorKind::AlreadyBorrowed`] if
    /// somebody already has it.
    #[instrument(skip(self))]
    pub async fn borrow(&self, volume_id: VolumeId, borrower_id: BorrowerId) -> Result<()> {
        let mut tx = self.begin().await?;
        match sqlx::query(include_str!("../queries/insert_borrowing.sql"))
            .bind(volume_id)
            .bind(borrower_id)
            .bind(UtcDateTime::now().unix_timestamp())
            .execute(&mut *tx)
            .await
        {
            Err(e) if is_unique_violation(&e) => {
                return Err(e).or_raise(|| ErrorKind::AlreadyBorrowed(volume_id));
            },
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(e).or_raise(|| ErrorKind::NotFound("volume or borrower"));
            },
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        self.finish(tx).await
    }

    /// End a borrowing. The volume itself stays in the catalog.
    #[instrument(skip(self))]
    pub async fn return_volume(&self, volume_id: VolumeId, borrower_id: BorrowerId) -> Result<()> {
        let mut tx = self.begin().await?;
        let result = sqlx::query(include_str!("../queries/delete_borrowing.sql"))
            .bind(volume_id)
            .bind(borrower_id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::NotBorrowed(volume_id));
        }
        self.finish(tx).await
    }

    pub async fn list_borrowings(&self) -> Result<Vec<Borrowing>> {
        let rows: Vec<BorrowingRow> = sqlx::query_as(include_str!("../queries/list_borrowings.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Borrowing::try_from).collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn insert_book(conn: &mut SqliteConnection, metadata: &BookMetadata) -> Result<BookId> {
        let pages = (metadata.pages >= 0).then_some(metadata.pages);
        let book_id: i64 = sqlx::query_scalar(include_str!("../queries/insert_book.sql"))
            .bind(metadata.title.as_str())
            .bind(metadata.publish_date.as_str())
            .bind(pages)
            .fetch_one(&mut *conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::insert_identifiers(conn, book_id, &metadata.identifiers).await?;
        Ok(book_id)
    }

    async fn insert_identifiers(conn: &mut SqliteConnection, book_id: BookId, identifiers: &Identifiers) -> Result<()> {
        for (kind, value) in identifiers.known() {
            match sqlx::query(include_str!("../queries/insert_identifier.sql"))
                .bind(book_id)
                .bind(kind.as_str())
                .bind(value)
                .execute(&mut *conn)
                .await
            {
                Err(e) if is_foreign_key_violation(&e) => return Err(e).or_raise(|| ErrorKind::NotFound("book")),
                other => other.or_raise(|| ErrorKind::Database)?,
            };
        }
        Ok(())
    }

    async fn upsert_author(conn: &mut SqliteConnection, name: &str) -> Result<Keyed> {
        Self::keyed(
            conn,
            include_str!("../queries/insert_author.sql"),
            include_str!("../queries/get_author_id.sql"),
            name,
        )
        .await
    }

    async fn upsert_publisher(conn: &mut SqliteConnection, name: &str) -> Result<Keyed> {
        Self::keyed(
            conn,
            include_str!("../queries/insert_publisher.sql"),
            include_str!("../queries/get_publisher_id.sql"),
            name,
        )
        .await
    }

    /// Insert a row by its unique name, or fetch the id of the row that
    /// already has it.
    async fn keyed(
        conn: &mut SqliteConnection,
        insert: &'static str,
        select: &'static str,
        name: &str,
    ) -> Result<Keyed> {
        let inserted: Option<i64> = sqlx::query_scalar(insert)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if let Some(id) = inserted {
            return Ok(Keyed::Created(id));
        }
        let id: i64 = sqlx::query_scalar(select)
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .or_raise(|| ErrorKind::Database)?;
        debug!(id, name, "natural key already exists, reusing");
        Ok(Keyed::Existing(id))
    }

    async fn link(conn: &mut SqliteConnection, sql: &'static str, entity_id: i64, book_id: BookId) -> Result<()> {
        match sqlx::query(sql).bind(entity_id).bind(book_id).execute(&mut *conn).await {
            Err(e) if is_foreign_key_violation(&e) => return Err(e).or_raise(|| ErrorKind::NotFound("book")),
            other => other.or_raise(|| ErrorKind::Database)?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use toshokan_extract::models::sentinel::{NOT_AVAILABLE, UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES};

    async fn repository() -> (Database, Repository) {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        (db, repo)
    }

    fn make_test_book() -> Book {
        Book::new(BookMetadata {
            title: "Slow Reading".to_string(),
            authors: vec!["John Miedema".to_string()],
            publishers: vec!["Duluth, Minn".to_string(), "Litwin Books".to_string()],
            publish_date: "March 2009".to_string(),
            pages: 92,
            identifiers: Identifiers::new()
                .with(IdentifierKind::Isbn13, "9780980200447")
                .with(IdentifierKind::Lccn, "2008054742"),
        })
    }

    #[tokio::test]
    async fn test_add_and_get_book() {
        let (db, repo) = repository().await;
        let mut book = make_test_book();
        let id = repo.add_book(&mut book).await.unwrap();
        assert_eq!(book.id(), Some(id));

        let stored = repo.get_book(id).await.unwrap().unwrap();
        assert_eq!(stored, book);
        assert_eq!(stored.identifiers().get(IdentifierKind::Oclc), NOT_AVAILABLE);
        db.close().await;
    }

    #[tokio::test]
    async fn test_add_book_twice_is_rejected() {
        let (db, repo) = repository().await;
        let mut book = make_test_book();
        let id = repo.add_book(&mut book).await.unwrap();
        let err = repo.add_book(&mut book).await.unwrap_err();
        assert_eq!(*err, ErrorKind::AlreadyStored(id));
        db.close().await;
    }

    #[tokio::test]
    async fn test_sentinel_book_round_trip() {
        let (db, repo) = repository().await;
        let mut book = Book::new(BookMetadata::default());
        let id = repo.add_book(&mut book).await.unwrap();
        let stored = repo.get_book(id).await.unwrap().unwrap();
        assert_eq!(stored.metadata().title, UNKNOWN);
        assert_eq!(stored.metadata().authors, vec![UNKNOWN_AUTHOR]);
        assert_eq!(stored.metadata().publishers, vec![UNKNOWN]);
        assert_eq!(stored.metadata().pages, UNKNOWN_PAGES);
        db.close().await;
    }

    #[tokio::test]
    async fn test_get_missing_book() {
        let (db, repo) = repository().await;
        assert!(repo.get_book(42).await.unwrap().is_none());
        db.close().await;
    }

    #[tokio::test]
    async fn test_store_then_link_keeps_author_order() {
        let (db, repo) = repository().await;
        let book = Book::new(BookMetadata { title: "Good Omens".to_string(), ..Default::default() });
        let id = repo.store(&book).await.unwrap();
        assert!(book.id().is_none());
        assert!(repo.link_author(id, "Terry Pratchett").await.unwrap().is_created());
        assert!(repo.link_author(id, "Neil Gaiman").await.unwrap().is_created());
        repo.link_publisher(id, "Gollancz").await.unwrap();
        let stored = repo.get_book(id).await.unwrap().unwrap();
        assert_eq!(stored.metadata().authors, vec!["Terry Pratchett", "Neil Gaiman"]);
        assert_eq!(stored.metadata().publishers, vec!["Gollancz"]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_authors_are_shared_between_books() {
        let (db, repo) = repository().await;
        let first = repo.store(&Book::new(BookMetadata::default())).await.unwrap();
        let second = repo.store(&Book::new(BookMetadata::default())).await.unwrap();
        let created = repo.link_author(first, "Plutarch").await.unwrap();
        let existing = repo.link_author(second, "Plutarch").await.unwrap();
        assert!(created.is_created());
        assert_eq!(existing, Keyed::Existing(created.id()));
        db.close().await;
    }

    #[tokio::test]
    async fn test_link_to_missing_book() {
        let (db, repo) = repository().await;
        let err = repo.link_author(42, "Plutarch").await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("book"));
        db.close().await;
    }

    #[rstest]
    #[case(IdentifierKind::Isbn13, "9780980200447", true)]
    #[case(IdentifierKind::Lccn, "2008054742", true)]
    #[case(IdentifierKind::Isbn10, "1936117363", false)]
    #[case(IdentifierKind::Oclc, NOT_AVAILABLE, false)]
    #[tokio::test]
    async fn test_find_by_identifier(#[case] kind: IdentifierKind, #[case] value: &str, #[case] found: bool) {
        let (db, repo) = repository().await;
        repo.add_book(&mut make_test_book()).await.unwrap();
        assert_eq!(repo.find_by_identifier(kind, value).await.unwrap().is_some(), found);
        db.close().await;
    }

    #[tokio::test]
    async fn test_update_identifiers() {
        let (db, repo) = repository().await;
        let mut book = make_test_book();
        let id = repo.add_book(&mut book).await.unwrap();
        let updated = book.identifiers().clone().with(IdentifierKind::Oclc, "297222669").with(IdentifierKind::Lccn, "");
        book.update_identifiers(updated);
        repo.update_identifiers(&book).await.unwrap();

        let stored = repo.get_book(id).await.unwrap().unwrap();
        assert_eq!(stored.identifiers().get(IdentifierKind::Oclc), "297222669");
        assert_eq!(stored.identifiers().get(IdentifierKind::Lccn), NOT_AVAILABLE);
        assert!(repo.find_by_identifier(IdentifierKind::Lccn, "2008054742").await.unwrap().is_none());
        db.close().await;
    }

    #[tokio::test]
    async fn test_update_identifiers_of_unstored_book() {
        let (db, repo) = repository().await;
        let err = repo.update_identifiers(&make_test_book()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("book"));
        db.close().await;
    }

    #[tokio::test]
    async fn test_volumes_and_libraries() {
        let (db, repo) = repository().await;
        let book_id = repo.add_book(&mut make_test_book()).await.unwrap();
        let first = repo.create_volume(book_id).await.unwrap();
        let second = repo.create_volume(book_id).await.unwrap();
        let home = repo.add_library("Home").await.unwrap();
        let office = repo.add_library("Office").await.unwrap();
        assert_eq!(repo.add_library("Home").await.unwrap(), Keyed::Existing(home.id()));

        repo.assign_volume_to_library(first, home.id()).await.unwrap();
        // Moving a volume replaces its collection; it never sits in two libraries.
        repo.assign_volume_to_library(first, office.id()).await.unwrap();

        let volumes = repo.list_volumes(book_id).await.unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].id, first);
        assert_eq!(volumes[0].library.as_deref(), Some("Office"));
        assert_eq!(volumes[1].id, second);
        assert_eq!(volumes[1].library, None);
        db.close().await;
    }

    #[tokio::test]
    async fn test_volume_of_missing_book() {
        let (db, repo) = repository().await;
        let err = repo.create_volume(42).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("book"));
        db.close().await;
    }

    #[tokio::test]
    async fn test_assign_to_missing_library() {
        let (db, repo) = repository().await;
        let book_id = repo.add_book(&mut make_test_book()).await.unwrap();
        let volume = repo.create_volume(book_id).await.unwrap();
        let err = repo.assign_volume_to_library(volume, 42).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("volume or library"));
        db.close().await;
    }

    #[tokio::test]
    async fn test_lending() {
        let (db, repo) = repository().await;
        let book_id = repo.add_book(&mut make_test_book()).await.unwrap();
        let volume = repo.create_volume(book_id).await.unwrap();
        let jane = repo.add_borrower("Jane Doe", "555-0100").await.unwrap();
        let john = repo.add_borrower("John Doe", "555-0199").await.unwrap();
        assert_eq!(repo.add_borrower("J. Doe", "555-0100").await.unwrap(), Keyed::Existing(jane.id()));

        repo.borrow(volume, jane.id()).await.unwrap();
        let err = repo.borrow(volume, john.id()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::AlreadyBorrowed(volume));

        let borrowings = repo.list_borrowings().await.unwrap();
        assert_eq!(borrowings.len(), 1);
        assert_eq!(borrowings[0].borrower, "Jane Doe");
        assert_eq!(borrowings[0].title, "Slow Reading");
        assert_eq!(repo.list_volumes(book_id).await.unwrap()[0].borrowed_by, Some(jane.id()));

        let err = repo.return_volume(volume, john.id()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotBorrowed(volume));
        repo.return_volume(volume, jane.id()).await.unwrap();
        assert!(repo.list_borrowings().await.unwrap().is_empty());
        // Returning removes the borrowing, never the volume.
        assert_eq!(repo.list_volumes(book_id).await.unwrap().len(), 1);
        repo.borrow(volume, john.id()).await.unwrap();
        db.close().await;
    }

    #[tokio::test]
    async fn test_borrow_missing_volume() {
        let (db, repo) = repository().await;
        let jane = repo.add_borrower("Jane Doe", "555-0100").await.unwrap();
        let err = repo.borrow(42, jane.id()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound("volume or borrower"));
        db.close().await;
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::new(db.pool().clone(), true);
        assert!(repo.is_dry_run());
        let mut book = make_test_book();
        let id = repo.add_book(&mut book).await.unwrap();
        assert!(book.id().is_none());
        assert!(repo.get_book(id).await.unwrap().is_none());
        assert!(repo.add_library("Home").await.unwrap().is_created());
        assert!(repo.add_library("Home").await.unwrap().is_created());
        db.close().await;
    }
}
