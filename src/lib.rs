//! # parcraft
//!
//! A library for finding and tagging pseudoautosomal (PAR) gene duplicates in
//! GTF/GFF3 annotation files.
//!
//! Genes in the pseudoautosomal regions of the sex chromosomes are annotated
//! twice, once on X and once on Y, with the same NCBI `GeneID`. Tools that
//! expect one record per gene trip over these copies. `parcraft` finds them,
//! tags the copies on one chromosome with `tag=PAR`, and can filter the tagged
//! copies out again.
//!
//! ## Features
//!
//! - **Syntax detection**: GTF and GFF3 attributes are detected per line and preserved on output
//! - **Known PAR regions**: Duplicates inside PAR regions from assembly metadata are tagged
//! - **Inferred PAR genes**: Duplicates whose copies encode identical proteins are tagged too
//! - **Byte-exact passthrough**: Lines that are not tagged are written exactly as read
//!
//! ## Example
//!
//! ```rust,no_run
//! use parcraft::{AssemblyMetadata, FeatureIndex, ParClassifier, ParTagger};
//! use parcraft::parsing::io::{open_input, AtomicOutput};
//! use std::path::Path;
//!
//! let asm_index = FeatureIndex::from_path(Path::new("GRCh38.asm.gff3")).unwrap();
//! let assembly = AssemblyMetadata::from_index(&asm_index).unwrap();
//!
//! let data = Path::new("GRCh38_latest_genomic.gff.gz");
//! let index = FeatureIndex::from_path(data).unwrap();
//! let classification = ParClassifier::new(&index, &assembly).classify(None).unwrap();
//!
//! let mut output = AtomicOutput::create(Path::new("tagged.gff.gz")).unwrap();
//! let summary = ParTagger::new(&assembly, &classification, "Y")
//!     .run(open_input(data).unwrap(), &mut output)
//!     .unwrap();
//! output.commit().unwrap();
//! println!("tagged {} features", summary.tagged);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Features, regions, assembly metadata and classification outcomes
//! - [`parsing`]: GTF/GFF3 codec, gzip-aware IO and translation lookup
//! - [`index`]: In-memory feature store with hierarchy and overlap queries
//! - [`classify`]: Duplicate-gene detection and PAR classification
//! - [`rewrite`]: Streaming tag and filter passes
//! - [`cli`]: Command-line interface implementation

pub mod classify;
pub mod cli;
pub mod core;
pub mod index;
pub mod parsing;
pub mod rewrite;

// Re-export commonly used types for convenience
pub use classify::par::{ParClassification, ParClassifier};
pub use core::assembly::AssemblyMetadata;
pub use core::feature::Feature;
pub use core::types::*;
pub use index::FeatureIndex;
pub use rewrite::filter::filter_par_features;
pub use rewrite::tag::ParTagger;
