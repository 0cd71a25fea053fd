//! Assembly metadata: chromosomes, allosomes and known PAR regions.
//!
//! The metadata comes from a small GFF3 file describing the assembly:
//!
//! - `chromosome` features carry `Dbxref=RefSeq:<accession>`, a canonical
//!   `Name` (e.g., "X") and optionally `tag=allosome`
//! - `region` features tagged `PAR` point to their chromosome via `Parent`
//!
//! Annotation data is keyed by `RefSeq` accession, so every lookup here is
//! by accession rather than by the metadata file's own seqids.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::core::feature::{Feature, PAR_TAG, TAG_KEY};
use crate::core::region::Region;
use crate::index::FeatureIndex;
use crate::parsing::record::ParseError;

/// Cross-reference database naming the chromosome accession
pub const REFSEQ_DB: &str = "RefSeq";

/// Tag value marking a sex chromosome
pub const ALLOSOME_TAG: &str = "allosome";

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("RefSeq accession not found for chromosome '{0}'")]
    MissingRefSeq(String),

    #[error("Name not found for chromosome '{0}'")]
    MissingName(String),

    #[error("Parent not found for PAR region '{0}'")]
    MissingParent(Region),

    #[error("cannot resolve parent '{parent}' of PAR region '{region}'")]
    UnresolvedParent { parent: String, region: Region },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A chromosome declared in assembly metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    /// Canonical name (e.g., "X", "Y", "1")
    pub name: String,
    /// Full extent, keyed by `RefSeq` accession
    pub region: Region,
    pub allosome: bool,
}

/// Chromosome naming, allosomes and known PAR regions for one assembly
#[derive(Debug, Clone, Default)]
pub struct AssemblyMetadata {
    chromosomes: Vec<Chromosome>,
    accession_to_name: HashMap<String, String>,
    allosomes: HashSet<String>,
    known_par_regions: Vec<Region>,
}

impl AssemblyMetadata {
    /// Extract assembly metadata from an indexed metadata file
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError` if a chromosome lacks a `RefSeq` cross-reference
    /// or a `Name`, or if a PAR region's parent cannot be resolved to a
    /// chromosome with a `RefSeq` cross-reference.
    pub fn from_index(index: &FeatureIndex) -> Result<Self, AssemblyError> {
        let mut metadata = Self::default();

        for feature in index.features_of_type("chromosome", None) {
            let accession = refseq_accession(feature)?;
            let name = feature
                .first("Name")
                .ok_or_else(|| AssemblyError::MissingName(feature.seqid.clone()))?;
            let allosome = feature.has_value(TAG_KEY, ALLOSOME_TAG);

            metadata.add_chromosome(Chromosome {
                name: name.to_string(),
                region: Region::new(accession, feature.start, feature.end),
                allosome,
            });
        }

        for feature in index.features_of_type("region", None) {
            if !feature.has_value(TAG_KEY, PAR_TAG) {
                continue;
            }
            let parent_id = feature
                .parents()
                .first()
                .ok_or_else(|| AssemblyError::MissingParent(feature.region()))?;
            let parent = index
                .get(parent_id)
                .ok_or_else(|| AssemblyError::UnresolvedParent {
                    parent: parent_id.clone(),
                    region: feature.region(),
                })?;
            let accession = refseq_accession(parent)?;
            metadata
                .known_par_regions
                .push(Region::new(accession, feature.start, feature.end));
        }

        Ok(metadata)
    }

    /// Register a chromosome
    pub fn add_chromosome(&mut self, chromosome: Chromosome) {
        let accession = chromosome.region.accession.clone();
        if chromosome.allosome {
            self.allosomes.insert(accession.clone());
        }
        self.accession_to_name
            .insert(accession, chromosome.name.clone());
        self.chromosomes.push(chromosome);
    }

    /// Register a known PAR region
    pub fn add_known_par_region(&mut self, region: Region) {
        self.known_par_regions.push(region);
    }

    /// Canonical chromosome name for a sequence accession
    #[must_use]
    pub fn canonical_name(&self, accession: &str) -> Option<&str> {
        self.accession_to_name.get(accession).map(String::as_str)
    }

    #[must_use]
    pub fn is_allosome(&self, accession: &str) -> bool {
        self.allosomes.contains(accession)
    }

    /// Chromosomes in metadata file order
    #[must_use]
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    #[must_use]
    pub fn known_par_regions(&self) -> &[Region] {
        &self.known_par_regions
    }
}

fn refseq_accession(feature: &Feature) -> Result<String, AssemblyError> {
    feature
        .xref(REFSEQ_DB)?
        .map(str::to_string)
        .ok_or_else(|| AssemblyError::MissingRefSeq(feature.seqid.clone()))
}
