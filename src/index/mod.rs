//! In-memory feature indexing.
//!
//! A [`FeatureIndex`] is built in a single pass over a GTF/GFF3 file and
//! answers the queries the PAR workflow needs:
//!
//! - features of a type, optionally restricted to a chromosome region
//! - a feature by its `ID`
//! - the direct children, or all descendants, of a feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use parcraft::core::region::Region;
//! use parcraft::index::FeatureIndex;
//! use std::path::Path;
//!
//! let index = FeatureIndex::from_path(Path::new("GRCh38_latest_genomic.gff.gz")).unwrap();
//! let par1 = Region::new("NC_000024.10", 10_001, 2_781_479);
//! for gene in index.features_of_type("gene", Some(&par1)) {
//!     println!("{:?}", gene.id());
//! }
//! ```
//!
//! Results come back in file order, which is stable within a run but carries
//! no meaning; callers should treat them as sets.

pub mod overlap;
pub mod store;

pub use store::FeatureIndex;
