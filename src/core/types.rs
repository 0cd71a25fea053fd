use serde::{Deserialize, Serialize};

/// Outcome of PAR classification for a duplicate gene id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParStatus {
    /// Found inside a known PAR region from assembly metadata
    Known,
    /// Every occurrence translates to the same set of sequences
    Inferred,
    /// Allosome-only duplicate that could not be confirmed
    Unresolved,
}

impl ParStatus {
    /// Whether genes with this status get a PAR tag
    #[must_use]
    pub fn is_par(self) -> bool {
        matches!(self, Self::Known | Self::Inferred)
    }
}

impl std::fmt::Display for ParStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known => write!(f, "known"),
            Self::Inferred => write!(f, "inferred"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}
