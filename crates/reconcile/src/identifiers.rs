use crate::engine::Session;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::trace::Field;
use toshokan_extract::models::sentinel::is_unknown_identifier;
use toshokan_extract::{IdentifierKind, Identifiers};
use tracing::instrument;

impl<R: Resolver + ?Sized> Session<'_, R> {
    pub(crate) fn identifiers(&mut self, a: &Identifiers, b: &Identifiers) -> Result<Identifiers> {
        let mut merged = Identifiers::new();
        for kind in IdentifierKind::ALL {
            let value = self.scalar(
                Field::Identifier(kind),
                a.get(kind),
                b.get(kind),
                |value| is_unknown_identifier(value),
                |value| value.to_string(),
            )?;
            merged.set(kind, value);
        }
        Ok(merged)
    }
}

/// Merge two identifier sets kind by kind: a sentinel loses to a value,
/// equal values (sentinels included) are kept, and two different values are
/// a conflict for the resolver.
#[instrument(skip_all)]
pub fn merge_identifiers<R>(a: &Identifiers, b: &Identifiers, resolver: &mut R) -> Result<Identifiers>
where
    R: Resolver + ?Sized,
{
    Session::new(resolver).identifiers(a, b)
}
