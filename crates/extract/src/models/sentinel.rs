//! Reserved values standing for "this field is intentionally unknown".
//!
//! Every [`BookMetadata`](super::BookMetadata) field is always populated;
//! when a source has nothing to say about a field the adapter fills in the
//! sentinel for that field instead. Sentinels differ per field, and some
//! fields accept more than one spelling because the upstream sources never
//! agreed on one.

/// Generic "unknown" marker for titles, publishers and publishing dates.
pub const UNKNOWN: &str = "UNKNOWN";
/// Title used when a source returns a record without one.
pub const UNTITLED: &str = "Untitled";
/// Author list entry used when a source has no authors.
pub const UNKNOWN_AUTHOR: &str = "unknown";
/// Identifier value used when a source has no identifier of that kind.
pub const NOT_AVAILABLE: &str = "N/A";
/// Page count used when a source has no page count. Zero is a (degenerate)
/// real page count, so the sentinel is negative.
pub const UNKNOWN_PAGES: i64 = -1;

pub fn is_unknown_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty() || title == UNTITLED || title.eq_ignore_ascii_case(UNKNOWN)
}

/// `["unknown"]`, `["UNKNOWN"]` and the (invalid, but tolerated) empty list.
pub fn is_unknown_authors(authors: &[String]) -> bool {
    is_unknown_list(authors)
}

pub fn is_unknown_publishers(publishers: &[String]) -> bool {
    is_unknown_list(publishers)
}

pub fn is_unknown_date(date: &str) -> bool {
    let date = date.trim();
    date.is_empty() || date.eq_ignore_ascii_case(UNKNOWN)
}

pub fn is_unknown_pages(pages: i64) -> bool {
    pages < 0
}

pub fn is_unknown_identifier(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NOT_AVAILABLE
}

fn is_unknown_list(values: &[String]) -> bool {
    match values {
        [] => true,
        [only] => only.trim().is_empty() || only.trim().eq_ignore_ascii_case(UNKNOWN),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Untitled", true)]
    #[case("UNKNOWN", true)]
    #[case("  ", true)]
    #[case("Slow Reading", false)]
    #[case("untitled", false)]
    fn title_sentinels(#[case] title: &str, #[case] expected: bool) {
        assert_eq!(is_unknown_title(title), expected);
    }

    #[rstest]
    #[case(vec![], true)]
    #[case(vec!["unknown"], true)]
    #[case(vec!["UNKNOWN"], true)]
    #[case(vec!["John Miedema"], false)]
    #[case(vec!["unknown", "John Miedema"], false)]
    fn author_sentinels(#[case] authors: Vec<&str>, #[case] expected: bool) {
        let authors = authors.into_iter().map(String::from).collect::<Vec<_>>();
        assert_eq!(is_unknown_authors(&authors), expected);
    }

    #[test]
    fn pages_zero_is_known() {
        assert!(!is_unknown_pages(0));
        assert!(is_unknown_pages(UNKNOWN_PAGES));
    }

    #[test]
    fn identifier_sentinel() {
        assert!(is_unknown_identifier(NOT_AVAILABLE));
        assert!(is_unknown_identifier(""));
        assert!(!is_unknown_identifier("9780980200447"));
    }
}
