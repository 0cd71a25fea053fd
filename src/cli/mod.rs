//! Command-line interface for parcraft.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **tag**: Find PAR genes and tag their features on the target chromosome
//! - **filter**: Remove every feature tagged `PAR`
//!
//! ## Usage
//!
//! ```text
//! # Tag known PAR genes only
//! parcraft tag --in-data-file GRCh38_latest_genomic.gff.gz \
//!     --asm-conf-file GRCh38.asm.gff3 --out-data-file tagged.gff.gz
//!
//! # Also infer PAR genes from identical translations on X and Y
//! parcraft tag --in-data-file GRCh38_latest_genomic.gff.gz \
//!     --asm-conf-file GRCh38.asm.gff3 --transl-file GRCh38_latest_protein.faa \
//!     --out-data-file tagged.gff.gz --report-file par.json
//!
//! # Drop the tagged copies
//! parcraft filter --in-data-file tagged.gff.gz --out-data-file filtered.gff.gz
//! ```

use clap::{Parser, Subcommand};

pub mod filter;
pub mod tag;

#[derive(Parser)]
#[command(name = "parcraft")]
#[command(version)]
#[command(about = "Tag and filter duplicate PAR gene annotations in GTF/GFF3 files")]
#[command(
    long_about = "parcraft finds genes annotated on more than one chromosome with the same NCBI GeneID.\n\nDuplicates confined to the sex chromosomes are classified as pseudoautosomal (PAR) genes when they lie in a known PAR region or, given a translation file, when every copy encodes the same proteins. Their features on the target chromosome are tagged 'PAR' so they can be filtered out downstream."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove features tagged PAR
    Filter(filter::FilterArgs),

    /// Tag features of PAR genes on the target chromosome
    Tag(tag::TagArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Level name understood by `tracing_subscriber::EnvFilter`
    #[must_use]
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            // tracing has no level above error
            Self::Error | Self::Critical => "error",
        }
    }
}
