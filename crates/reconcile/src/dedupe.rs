//! Author name deduplication.
//!
//! Sources disagree on capitalisation far more often than on spelling
//! ("Adam Smith" vs "ADAM SMITH"), so names are grouped case-insensitively
//! and the resolver picks the canonical spelling of every group that has
//! more than one.

use crate::engine::Session;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::trace::Field;
use tracing::instrument;

impl<R: Resolver + ?Sized> Session<'_, R> {
    pub(crate) fn dedupe(&mut self, names: &[String]) -> Result<Vec<String>> {
        // Quadratic, but author lists are tiny.
        let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
        for name in names {
            let folded = name.to_lowercase();
            match groups.iter_mut().find(|(key, _)| *key == folded) {
                Some((_, spellings)) if spellings.contains(&name.as_str()) => {},
                Some((_, spellings)) => spellings.push(name),
                None => groups.push((folded, vec![name])),
            }
        }
        let mut deduped = Vec::with_capacity(groups.len());
        for (_, spellings) in groups {
            let canonical = match spellings.as_slice() {
                [only] => only.to_string(),
                _ => {
                    let options = spellings.iter().map(|s| s.to_string()).collect::<Vec<_>>();
                    let choice = self.resolve(Field::Authors, options)?;
                    spellings[choice].to_string()
                },
            };
            deduped.push(canonical);
        }
        Ok(deduped)
    }
}

/// Collapse case-variant duplicates in a combined author list, one entry per
/// group in order of first occurrence.
///
/// Groups whose members are all spelled identically are collapsed without
/// asking; otherwise the resolver is given the group's distinct spellings.
#[instrument(skip(resolver))]
pub fn dedupe<R: Resolver + ?Sized>(names: &[String], resolver: &mut R) -> Result<Vec<String>> {
    Session::new(resolver).dedupe(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Prefer, Scripted};
    use rstest::rstest;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn adam_smith() {
        let mut resolver = Scripted::new([1]);
        let deduped = dedupe(&names(&["Adam Smith", "ADAM SMITH", "Frank Applebaum"]), &mut resolver).unwrap();
        assert_eq!(deduped, names(&["Adam Smith", "Frank Applebaum"]));
        assert_eq!(resolver.calls(), 1);
    }

    #[test]
    fn selected_spelling_keeps_first_position() {
        let mut resolver = Scripted::new([3]);
        let input = names(&["adam smith", "Frank Applebaum", "ADAM SMITH", "Adam Smith"]);
        let deduped = dedupe(&input, &mut resolver).unwrap();
        assert_eq!(deduped, names(&["Adam Smith", "Frank Applebaum"]));
    }

    #[test]
    fn identical_spellings_need_no_prompt() {
        let mut resolver = Scripted::default();
        let deduped = dedupe(&names(&["John Miedema", "John Miedema"]), &mut resolver).unwrap();
        assert_eq!(deduped, names(&["John Miedema"]));
        assert_eq!(resolver.calls(), 0);
    }

    #[test]
    fn only_distinct_spellings_are_offered() {
        let mut resolver = Scripted::new([2]);
        let input = names(&["Jane Doe", "Jane Doe", "JANE DOE"]);
        assert_eq!(dedupe(&input, &mut resolver).unwrap(), names(&["JANE DOE"]));
    }

    #[test]
    fn out_of_range_index_is_asked_again() {
        let mut resolver = Scripted::new([5, 2]);
        let deduped = dedupe(&names(&["Jane Doe", "JANE DOE"]), &mut resolver).unwrap();
        assert_eq!(deduped, names(&["JANE DOE"]));
        assert_eq!(resolver.calls(), 2);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["Plutarch"])]
    #[case(&["Adam Smith", "ADAM SMITH", "Frank Applebaum", "frank applebaum"])]
    #[case(&["Ursula K. Le Guin", "URSULA K. LE GUIN", "ursula k. le guin", "Charles Vess"])]
    fn idempotent(#[case] input: &[&str]) {
        let mut resolver = Prefer::Second;
        let once = dedupe(&names(input), &mut resolver).unwrap();
        let twice = dedupe(&once, &mut resolver).unwrap();
        assert_eq!(once, twice);
    }
}
