use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::classify::par::{ParClassification, ParClassifier};
use crate::core::assembly::AssemblyMetadata;
use crate::core::types::ParStatus;
use crate::index::FeatureIndex;
use crate::parsing::io::{open_input, AtomicOutput};
use crate::parsing::translation::{TranslationFile, TranslationSource};
use crate::rewrite::tag::{ParTagger, TagSummary};

#[derive(Args)]
pub struct TagArgs {
    /// Input GTF/GFF3 file (plain or gzip)
    #[arg(long)]
    pub in_data_file: PathBuf,

    /// Assembly metadata (GFF3 with chromosomes and PAR regions)
    #[arg(long)]
    pub asm_conf_file: PathBuf,

    /// Output file (gzip-compressed if it ends in .gz)
    #[arg(long)]
    pub out_data_file: PathBuf,

    /// Translation FASTA used to infer PAR genes outside known PAR regions
    #[arg(long)]
    pub transl_file: Option<PathBuf>,

    /// Canonical name of the chromosome whose copies get tagged
    #[arg(long, default_value = "Y")]
    pub target_chrom: String,

    /// Write a JSON summary of the classification to this file
    #[arg(long)]
    pub report_file: Option<PathBuf>,
}

/// JSON report of one tagging run
#[derive(Debug, Serialize)]
pub struct TagReport<'a> {
    pub target_chrom: &'a str,
    pub known: Vec<&'a str>,
    pub inferred: Vec<&'a str>,
    pub unresolved: Vec<&'a str>,
    pub rejected: &'a BTreeMap<String, BTreeSet<String>>,
    pub tagging: TagSummary,
}

impl<'a> TagReport<'a> {
    #[must_use]
    pub fn new(
        target_chrom: &'a str,
        classification: &'a ParClassification,
        tagging: TagSummary,
    ) -> Self {
        Self {
            target_chrom,
            known: classification.with_status(ParStatus::Known).collect(),
            inferred: classification.with_status(ParStatus::Inferred).collect(),
            unresolved: classification.with_status(ParStatus::Unresolved).collect(),
            rejected: &classification.rejected,
            tagging,
        }
    }
}

pub fn run(args: TagArgs) -> anyhow::Result<()> {
    info!("Loading assembly metadata…");
    let asm_index = FeatureIndex::from_path(&args.asm_conf_file)
        .with_context(|| format!("Failed to read {}", args.asm_conf_file.display()))?;
    let assembly = AssemblyMetadata::from_index(&asm_index)
        .with_context(|| format!("Invalid assembly metadata in {}", args.asm_conf_file.display()))?;

    info!("Loading features…");
    let index = FeatureIndex::from_path(&args.in_data_file)
        .with_context(|| format!("Failed to read {}", args.in_data_file.display()))?;
    if index.is_empty() {
        warn!("No features found in {}", args.in_data_file.display());
    } else {
        info!("Indexed {} features", index.len());
    }

    let mut translations = args
        .transl_file
        .as_deref()
        .map(|path| {
            TranslationFile::open(path)
                .with_context(|| format!("Failed to open translation file {}", path.display()))
        })
        .transpose()?;

    let classification = ParClassifier::new(&index, &assembly)
        .classify(translations.as_mut().map(|t| t as &mut dyn TranslationSource))
        .with_context(|| format!("Failed to classify genes in {}", args.in_data_file.display()))?;
    drop(translations);
    drop(index);

    info!(
        "Found {} known and {} inferred PAR genes ({} unresolved, {} rejected)",
        classification.with_status(ParStatus::Known).count(),
        classification.with_status(ParStatus::Inferred).count(),
        classification.with_status(ParStatus::Unresolved).count(),
        classification.rejected.len()
    );

    info!("Tagging PAR features…");
    let reader = open_input(&args.in_data_file)
        .with_context(|| format!("Failed to open {}", args.in_data_file.display()))?;
    let mut output = AtomicOutput::create(&args.out_data_file)
        .with_context(|| format!("Failed to create {}", args.out_data_file.display()))?;
    let summary = ParTagger::new(&assembly, &classification, &args.target_chrom)
        .run(reader, &mut output)
        .with_context(|| format!("Failed to tag {}", args.in_data_file.display()))?;
    output
        .commit()
        .with_context(|| format!("Failed to write {}", args.out_data_file.display()))?;

    info!(
        "Tagged {} features out of {} lines",
        summary.tagged, summary.lines
    );

    if let Some(report_file) = &args.report_file {
        let report = TagReport::new(&args.target_chrom, &classification, summary);
        write_report(report_file, &report)?;
    }

    Ok(())
}

fn write_report(path: &Path, report: &TagReport<'_>) -> anyhow::Result<()> {
    let mut output = AtomicOutput::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    serde_json::to_writer_pretty(&mut output, report)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    output
        .write_all(b"\n")
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    output
        .commit()
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}
