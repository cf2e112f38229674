use regex::Regex;
use std::sync::LazyLock;

/// Runs of digits inside free-text pagination, e.g. `"xii, 318 p."`.
pub(crate) static PAGINATION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
/// Normalized LCCN: an optional alphabetic prefix followed by digits.
pub(crate) static LCCN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-z]{0,3})(\d+)$").unwrap());
/// OCLC numbers as printed in MARC records, `(OCoLC)ocm12345678` and friends.
pub(crate) static OCLC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\(ocolc\))?(?:ocm|ocn|on)?(\d+)$").unwrap());

pub(crate) const OPEN_LIBRARY_API: &str = "https://openlibrary.org/api/books";
pub(crate) const GOOGLE_BOOKS_API: &str = "https://www.googleapis.com/books/v1/volumes";
