use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::parsing::io::{open_input, AtomicOutput};
use crate::rewrite::filter::filter_par_features;

#[derive(Args)]
pub struct FilterArgs {
    /// Input GTF/GFF3 file (plain or gzip)
    #[arg(long)]
    pub in_data_file: PathBuf,

    /// Output file (gzip-compressed if it ends in .gz)
    #[arg(long)]
    pub out_data_file: PathBuf,
}

pub fn run(args: FilterArgs) -> anyhow::Result<()> {
    let reader = open_input(&args.in_data_file)
        .with_context(|| format!("Failed to open {}", args.in_data_file.display()))?;
    let mut output = AtomicOutput::create(&args.out_data_file)
        .with_context(|| format!("Failed to create {}", args.out_data_file.display()))?;

    info!("Filtering PAR features…");
    let summary = filter_par_features(reader, &mut output)
        .with_context(|| format!("Failed to filter {}", args.in_data_file.display()))?;
    output
        .commit()
        .with_context(|| format!("Failed to write {}", args.out_data_file.display()))?;

    info!(
        "Removed {} PAR features out of {} lines",
        summary.dropped, summary.lines
    );
    Ok(())
}
