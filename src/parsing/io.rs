//! Plain and gzip-compressed file access.
//!
//! Inputs ending in `.gz` or `.bgz` are decompressed transparently. Outputs
//! are written to a temporary file next to the destination and renamed into
//! place by [`AtomicOutput::commit`]; dropping an uncommitted output removes
//! the temporary file, so a failed run never leaves a truncated result.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::{NamedTempFile, TempPath};

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a file for buffered line reading, decompressing gzip by extension
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        // bgzip output is multi-member gzip
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

/// An output file that only appears at its destination once committed
pub struct AtomicOutput {
    writer: OutputWriter,
    temp_path: TempPath,
    destination: PathBuf,
}

impl AtomicOutput {
    /// Create a temporary file in the destination's directory
    ///
    /// The output is gzip-compressed if the destination ends in `.gz`/`.bgz`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the temporary file cannot be created.
    pub fn create(destination: &Path) -> io::Result<Self> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let (file, temp_path) = NamedTempFile::new_in(dir)?.into_parts();

        let writer = if is_gzipped(destination) {
            OutputWriter::Gzip(BufWriter::new(GzEncoder::new(file, Compression::default())))
        } else {
            OutputWriter::Plain(BufWriter::new(file))
        };

        Ok(Self {
            writer,
            temp_path,
            destination: destination.to_path_buf(),
        })
    }

    /// Flush everything and move the file to its destination
    ///
    /// # Errors
    ///
    /// Returns an IO error if flushing, compression or the final rename fails.
    pub fn commit(self) -> io::Result<()> {
        let file = match self.writer {
            OutputWriter::Plain(writer) => writer.into_inner().map_err(io::IntoInnerError::into_error)?,
            OutputWriter::Gzip(writer) => writer
                .into_inner()
                .map_err(io::IntoInnerError::into_error)?
                .finish()?,
        };
        file.sync_all()?;

        // Temporary files are created owner-only; results should not be
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o644))?;
        }
        drop(file);

        self.temp_path.persist(&self.destination)?;
        Ok(())
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.writer {
            OutputWriter::Plain(writer) => writer.write(buf),
            OutputWriter::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.writer {
            OutputWriter::Plain(writer) => writer.flush(),
            OutputWriter::Gzip(writer) => writer.flush(),
        }
    }
}
