//! Duplicate-gene detection and PAR classification.
//!
//! Genes in pseudoautosomal regions are annotated on both X and Y with the
//! same NCBI `GeneID`. Classification runs in two steps:
//!
//! 1. [`duplicates`]: group gene features by `GeneID` and find ids that
//!    occur on more than one chromosome
//! 2. [`par`]: keep duplicates confined to allosomes and decide for each
//!    whether it is a PAR gene
//!
//! A candidate is **known** when a copy lies inside a PAR region declared in
//! assembly metadata, and **inferred** when every copy translates to the same
//! set of protein sequences. Anything else stays **unresolved** and untagged.

use thiserror::Error;

use crate::parsing::record::ParseError;
use crate::parsing::translation::TranslationError;

pub mod duplicates;
pub mod par;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("GeneID not found for gene at {seqid}:{start}-{end} (ID: {})", .id.as_deref().unwrap_or("none"))]
    MissingGeneId {
        seqid: String,
        start: u64,
        end: u64,
        id: Option<String>,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Translation(#[from] TranslationError),
}
