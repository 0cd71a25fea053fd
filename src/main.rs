use clap::Parser;
use tracing_subscriber::EnvFilter;

mod classify;
mod cli;
mod core;
mod index;
mod parsing;
mod rewrite;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Log level applies to this crate only; dependencies stay at warn
    let filter = EnvFilter::new(format!("warn,parcraft={}", cli.log_level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Filter(args) => {
            cli::filter::run(args)?;
        }
        cli::Commands::Tag(args) => {
            cli::tag::run(args)?;
        }
    }

    Ok(())
}
