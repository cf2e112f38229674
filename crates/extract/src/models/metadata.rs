use super::Identifiers;
use super::sentinel::{UNKNOWN, UNKNOWN_AUTHOR, UNKNOWN_PAGES, UNTITLED};
use super::sentinel::{is_unknown_authors, is_unknown_date, is_unknown_pages, is_unknown_publishers, is_unknown_title};

/// Normalized description of a book, as reported by a single source.
///
/// Every field is always populated, either with real data or with the
/// field's [sentinel](super::sentinel). Adapters build one of these per
/// lookup; it is consumed once by reconciliation and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BookMetadata {
    /// Title of this edition
    pub title: String,
    /// Author names in source order (never empty)
    pub authors: Vec<String>,
    /// Publisher names, sorted lexically
    pub publishers: Vec<String>,
    /// Free-text date of publishing, as printed by the source
    pub publish_date: String,
    /// Number of pages, [`UNKNOWN_PAGES`] when unknown
    pub pages: i64,
    pub identifiers: Identifiers,
}

impl Default for BookMetadata {
    /// A record that knows nothing at all; every field holds its sentinel.
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_string(),
            authors: vec![UNKNOWN_AUTHOR.to_string()],
            publishers: vec![UNKNOWN.to_string()],
            publish_date: UNKNOWN.to_string(),
            pages: UNKNOWN_PAGES,
            identifiers: Identifiers::default(),
        }
    }
}

impl BookMetadata {
    /// Enforce the record invariants: trimmed values, sentinels in place of
    /// blanks, no empty author or publisher lists, publishers sorted.
    pub fn normalized(self) -> Self {
        let title = match is_unknown_title(&self.title) {
            true if self.title.trim() == UNTITLED => UNTITLED.to_string(),
            true => UNKNOWN.to_string(),
            false => self.title.trim().to_string(),
        };
        let authors = non_blank(self.authors);
        let authors = match is_unknown_authors(&authors) {
            true => vec![UNKNOWN_AUTHOR.to_string()],
            false => authors,
        };
        let mut publishers = non_blank(self.publishers);
        publishers.sort();
        let publishers = match is_unknown_publishers(&publishers) {
            true => vec![UNKNOWN.to_string()],
            false => publishers,
        };
        let publish_date = match is_unknown_date(&self.publish_date) {
            true => UNKNOWN.to_string(),
            false => self.publish_date.trim().to_string(),
        };
        let pages = match is_unknown_pages(self.pages) {
            true => UNKNOWN_PAGES,
            false => self.pages,
        };
        Self { title, authors, publishers, publish_date, pages, identifiers: self.identifiers }
    }

    /// Returns `true` if no field carries real data.
    pub fn is_empty(&self) -> bool {
        is_unknown_title(&self.title)
            && is_unknown_authors(&self.authors)
            && is_unknown_publishers(&self.publishers)
            && is_unknown_date(&self.publish_date)
            && is_unknown_pages(self.pages)
            && self.identifiers.known().next().is_none()
    }
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect()
}
