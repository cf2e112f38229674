mod builder;
mod dedupe;
mod engine;
pub mod error;
mod identifiers;
pub mod resolver;
mod trace;

pub use crate::builder::{CatalogRecord, build};
pub use crate::dedupe::dedupe;
pub use crate::engine::{Reconciled, reconcile, reconcile_all, reconcile_lookups};
pub use crate::error::ErrorKind;
pub use crate::identifiers::merge_identifiers;
pub use crate::resolver::{Policy, Resolver};
pub use crate::trace::{Field, Resolution};
