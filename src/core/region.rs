use serde::{Deserialize, Serialize};

/// A closed interval on one sequence accession
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Region {
    /// Sequence accession (e.g., "`NC_000024.10`")
    pub accession: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
}

impl Region {
    #[must_use]
    pub fn new(accession: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            accession: accession.into(),
            start,
            end,
        }
    }

    /// Two regions overlap unless one ends strictly before the other begins
    pub fn overlaps(&self, other: &Region) -> bool {
        self.accession == other.accession && self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.accession, self.start, self.end)
    }
}
