//! Readers and writers for annotation and sequence files.
//!
//! This module provides:
//!
//! - **record**: GTF/GFF3 data line codec with per-line attribute syntax detection
//! - **io**: Transparent gzip input and atomically committed (optionally gzip) output
//! - **translation**: Protein sequence lookup from FASTA (indexed or in memory)
//!
//! ## Example
//!
//! ```rust
//! use parcraft::parsing::record::parse_line;
//!
//! let line = "NC_000024.10\tBestRefSeq\tgene\t10001\t12000\t.\t+\t.\tID=gene-SHOX-2;Dbxref=GeneID:6473;gbkey=Gene";
//! let record = parse_line(line).unwrap();
//! assert_eq!(record.feature.gene_id().unwrap(), Some("6473"));
//! assert_eq!(record.to_line(), line);
//! ```
//!
//! ## Attribute syntax
//!
//! | Syntax | Example |
//! |--------|---------|
//! | GTF  | `gene_id "SHOX"; tag "basic"` |
//! | GFF3 | `ID=gene-SHOX;tag=basic` |

pub mod io;
pub mod record;
pub mod translation;
