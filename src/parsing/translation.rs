//! Random-access lookup of translation (protein) sequences by identifier.
//!
//! Uncompressed FASTA files are read through a noodles indexed reader. The
//! `.fai` next to the file is used when present; otherwise the index is built
//! in memory when the file is opened. Gzip-compressed files cannot be seeked,
//! so their records are loaded into memory up front.
//!
//! One [`TranslationFile`] is opened per run and closed when dropped.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::core::Region;
use noodles::fasta;
use noodles::fasta::fai::io::Reader as FaiReader;
use noodles::fasta::io::indexed_reader::{Builder as FastaBuilder, IndexedReader};
use thiserror::Error;
use tracing::debug;

use crate::parsing::io::is_gzipped;

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("translation '{0}' not found in translation file")]
    NotFound(String),
}

/// A source of translation sequences keyed by identifier
pub trait TranslationSource {
    /// Fetch the full sequence of one translation
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::NotFound` if the identifier is unknown.
    fn fetch(&mut self, id: &str) -> Result<Vec<u8>, TranslationError>;
}

impl TranslationSource for HashMap<String, Vec<u8>> {
    fn fetch(&mut self, id: &str) -> Result<Vec<u8>, TranslationError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| TranslationError::NotFound(id.to_string()))
    }
}

/// Translation sequences from a FASTA file
pub enum TranslationFile {
    Indexed {
        reader: IndexedReader<BufReader<File>>,
        names: HashSet<String>,
    },
    InMemory(HashMap<String, Vec<u8>>),
}

impl TranslationFile {
    /// Open a translation FASTA file
    ///
    /// # Errors
    ///
    /// Returns `TranslationError::Io` if the file cannot be read, or
    /// `TranslationError::Noodles` if it is not valid FASTA.
    pub fn open(path: &Path) -> Result<Self, TranslationError> {
        if is_gzipped(path) {
            debug!("Loading compressed translation file {}", path.display());
            let reader = BufReader::new(MultiGzDecoder::new(File::open(path)?));
            return Ok(Self::InMemory(read_sequences(reader)?));
        }

        let fai_path = fai_path(path);
        let index = if fai_path.exists() {
            FaiReader::new(BufReader::new(File::open(&fai_path)?))
                .read_index()
                .map_err(|e| TranslationError::Noodles(format!("Failed to parse FAI file: {e}")))?
        } else {
            debug!("No index at {}, indexing translation file", fai_path.display());
            fasta::io::index(path)
                .map_err(|e| TranslationError::Noodles(format!("Failed to index FASTA file: {e}")))?
        };

        let names = index
            .as_ref()
            .iter()
            .map(|record| String::from_utf8_lossy(record.name()).to_string())
            .collect();

        let reader = FastaBuilder::default()
            .set_index(index)
            .build_from_reader(BufReader::new(File::open(path)?))?;

        Ok(Self::Indexed { reader, names })
    }
}

impl TranslationSource for TranslationFile {
    fn fetch(&mut self, id: &str) -> Result<Vec<u8>, TranslationError> {
        match self {
            Self::Indexed { reader, names } => {
                if !names.contains(id) {
                    return Err(TranslationError::NotFound(id.to_string()));
                }
                let region = Region::new(id, ..);
                let record = reader
                    .query(&region)
                    .map_err(|e| TranslationError::Noodles(format!("Failed to fetch '{id}': {e}")))?;
                Ok(record.sequence().as_ref().to_vec())
            }
            Self::InMemory(sequences) => sequences.fetch(id),
        }
    }
}

fn fai_path(path: &Path) -> PathBuf {
    let mut fai = path.as_os_str().to_owned();
    fai.push(".fai");
    PathBuf::from(fai)
}

/// Read every record of a FASTA stream into memory
fn read_sequences<R: BufRead>(reader: R) -> Result<HashMap<String, Vec<u8>>, TranslationError> {
    let mut fasta_reader = fasta::io::Reader::new(reader);
    let mut sequences = HashMap::new();

    for result in fasta_reader.records() {
        let record = result
            .map_err(|e| TranslationError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        let name = String::from_utf8_lossy(record.name()).to_string();
        sequences.insert(name, record.sequence().as_ref().to_vec());
    }

    Ok(sequences)
}
