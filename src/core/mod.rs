//! Core data types for PAR duplicate detection.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Feature`](feature::Feature): One annotation line with ordered, multi-valued attributes
//! - [`Region`](region::Region): An inclusive interval on a sequence accession
//! - [`AssemblyMetadata`](assembly::AssemblyMetadata): Chromosome names, allosomes and known PAR regions
//! - [`ParStatus`](types::ParStatus): Classification outcome for a duplicate gene id
//!
//! ## Identifiers
//!
//! Annotation files are keyed by sequence accession, while canonical names
//! come from the assembly metadata:
//!
//! | Accession | Canonical name | Allosome |
//! |-----------|----------------|----------|
//! | `NC_000001.11` | 1 | no |
//! | `NC_000023.11` | X | yes |
//! | `NC_000024.10` | Y | yes |
//!
//! Genes are grouped across chromosomes by their NCBI `GeneID` cross-reference,
//! never by name.

pub mod assembly;
pub mod feature;
pub mod region;
pub mod types;
