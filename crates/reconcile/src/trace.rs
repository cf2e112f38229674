use std::fmt::{Display, Formatter, Result as FmtResult};
use toshokan_extract::IdentifierKind;

/// The record field a conflict was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Authors,
    Publishers,
    PublishDate,
    Pages,
    Identifier(IdentifierKind),
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Title => write!(f, "title"),
            Self::Authors => write!(f, "author"),
            Self::Publishers => write!(f, "publisher"),
            Self::PublishDate => write!(f, "publish date"),
            Self::Pages => write!(f, "page count"),
            Self::Identifier(kind) => write!(f, "{kind}"),
        }
    }
}

/// One decision made by a [`Resolver`](crate::Resolver) during
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub field: Field,
    /// The options as they were presented.
    pub options: Vec<String>,
    /// Index into `options` (0-based).
    pub choice: usize,
}

impl Resolution {
    pub fn chosen(&self) -> &str {
        self.options.get(self.choice).map(String::as_str).unwrap_or_default()
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: kept {:?} over {}", self.field, self.chosen(), self.options.len().saturating_sub(1))?;
        write!(f, " other option{}", if self.options.len() == 2 { "" } else { "s" })
    }
}
