use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::region::Region;
use crate::parsing::record::ParseError;

/// Ordered attribute map: key -> values, in the order they appeared on the line
pub type Attributes = IndexMap<String, Vec<String>>;

/// Attribute key holding cross-references (`DB:ID`)
pub const DBXREF_KEY: &str = "Dbxref";

/// Attribute key holding free-form tags (`PAR`, `allosome`, ...)
pub const TAG_KEY: &str = "tag";

/// Cross-reference database carrying the NCBI gene identifier
pub const GENE_ID_DB: &str = "GeneID";

/// Tag value marking a pseudoautosomal feature
pub const PAR_TAG: &str = "PAR";

/// Attribute syntax of the ninth column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeSyntax {
    /// `key "value"`
    Gtf,
    /// `key=value`
    Gff3,
}

impl std::fmt::Display for AttributeSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gtf => write!(f, "GTF"),
            Self::Gff3 => write!(f, "GFF3"),
        }
    }
}

/// A single annotation feature (one data line)
///
/// Score, strand and frame are kept as raw text so a re-serialized line
/// reproduces them exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Sequence accession (column 1)
    pub seqid: String,
    /// Annotation source (column 2)
    pub source: String,
    /// Feature type (column 3)
    pub feature_type: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    pub score: String,
    pub strand: String,
    pub frame: String,
    pub attributes: Attributes,
}

impl Feature {
    /// First value of an attribute, if present
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of an attribute (empty if absent)
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.attributes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether an attribute carries the given value
    #[must_use]
    pub fn has_value(&self, key: &str, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value)
    }

    /// Append a value to an attribute, creating the attribute at the end if absent
    pub fn push_value(&mut self, key: &str, value: impl Into<String>) {
        self.attributes
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    /// GFF3 `ID` attribute
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.first("ID")
    }

    /// GFF3 `Parent` attribute values
    #[must_use]
    pub fn parents(&self) -> &[String] {
        self.values("Parent")
    }

    /// Check if this feature carries a `tag=PAR` value
    #[must_use]
    pub fn is_par_tagged(&self) -> bool {
        self.has_value(TAG_KEY, PAR_TAG)
    }

    /// Check if this is a GenBank gene feature (`gbkey=Gene`)
    ///
    /// This covers `gene` and `pseudogene` rows alike, which is why the
    /// feature type column is not consulted.
    #[must_use]
    pub fn is_gene(&self) -> bool {
        self.first("gbkey") == Some("Gene")
    }

    /// Parse the `Dbxref` attribute into a database -> identifier map.
    ///
    /// Each value is split at its first `:`. Later entries for the same
    /// database replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidCrossReference` if a value has no `:`.
    pub fn dbxrefs(&self) -> Result<HashMap<&str, &str>, ParseError> {
        let mut xrefs = HashMap::new();
        for value in self.values(DBXREF_KEY) {
            let (db, id) = value
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidCrossReference(value.clone()))?;
            xrefs.insert(db, id);
        }
        Ok(xrefs)
    }

    /// Look up a single cross-reference by database name
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidCrossReference` if any `Dbxref` value is malformed.
    pub fn xref(&self, db: &str) -> Result<Option<&str>, ParseError> {
        Ok(self.dbxrefs()?.get(db).copied())
    }

    /// NCBI gene identifier (`Dbxref=GeneID:...`)
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidCrossReference` if any `Dbxref` value is malformed.
    pub fn gene_id(&self) -> Result<Option<&str>, ParseError> {
        self.xref(GENE_ID_DB)
    }

    /// Extent of this feature as a region on its own sequence
    #[must_use]
    pub fn region(&self) -> Region {
        Region::new(&self.seqid, self.start, self.end)
    }
}
