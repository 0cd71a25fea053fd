use std::collections::HashSet;
use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::info;

use crate::classify::par::ParClassification;
use crate::core::assembly::AssemblyMetadata;
use crate::core::feature::{PAR_TAG, TAG_KEY};
use crate::core::types::ParStatus;
use crate::parsing::record::{is_comment, parse_line, ParseError, FASTA_DIRECTIVE};
use crate::rewrite::{next_line, split_terminator};

/// Line counts from one tagging pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub lines: usize,
    pub tagged: usize,
}

/// Tags target-chromosome features of PAR genes while copying a file
pub struct ParTagger<'a> {
    assembly: &'a AssemblyMetadata,
    classification: &'a ParClassification,
    par_gene_ids: HashSet<&'a str>,
    target_chrom: &'a str,
}

impl<'a> ParTagger<'a> {
    #[must_use]
    pub fn new(
        assembly: &'a AssemblyMetadata,
        classification: &'a ParClassification,
        target_chrom: &'a str,
    ) -> Self {
        Self {
            assembly,
            classification,
            par_gene_ids: classification.par_gene_ids(),
            target_chrom,
        }
    }

    /// Copy `reader` to `writer`, appending `PAR` to the `tag` attribute of
    /// every target-chromosome feature whose `GeneID` is a PAR gene
    ///
    /// Comments, blank lines, untouched data lines and anything after a
    /// `##FASTA` directive are written exactly as read.
    ///
    /// # Errors
    ///
    /// Returns a parse error (with line number) for the first malformed data
    /// line, or `ParseError::Io` if reading or writing fails.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<TagSummary, ParseError> {
        let mut summary = TagSummary::default();
        let mut buf = String::new();
        let mut in_sequences = false;

        while next_line(&mut reader, &mut buf)? {
            summary.lines += 1;
            let (content, terminator) = split_terminator(&buf);

            if content.starts_with(FASTA_DIRECTIVE) {
                in_sequences = true;
            }
            if in_sequences || content.trim().is_empty() || is_comment(content) {
                writer.write_all(buf.as_bytes())?;
                continue;
            }

            match self
                .tag_line(content)
                .map_err(|e| e.at_line(summary.lines))?
            {
                Some(tagged) => {
                    summary.tagged += 1;
                    writer.write_all(tagged.as_bytes())?;
                    writer.write_all(terminator.as_bytes())?;
                }
                None => writer.write_all(buf.as_bytes())?,
            }
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Re-rendered line if this data line needs a PAR tag
    fn tag_line(&self, content: &str) -> Result<Option<String>, ParseError> {
        let mut record = parse_line(content)?;

        if self.assembly.canonical_name(&record.feature.seqid) != Some(self.target_chrom) {
            return Ok(None);
        }
        let Some(gene_id) = record.feature.gene_id()? else {
            return Ok(None);
        };
        if !self.par_gene_ids.contains(gene_id) || record.feature.is_par_tagged() {
            return Ok(None);
        }

        if self.classification.status(gene_id) == Some(ParStatus::Inferred) {
            info!(
                "tagging feature of inferred PAR gene '{gene_id}': {}:{}-{} {}",
                record.feature.seqid,
                record.feature.start,
                record.feature.end,
                record.feature.feature_type
            );
        }

        record.feature.push_value(TAG_KEY, PAR_TAG);
        Ok(Some(record.to_line()))
    }
}
