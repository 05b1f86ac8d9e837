use clap::Parser;
use tracing_subscriber::EnvFilter;

use prophasm::cli::Args;

fn main() -> miette::Result<()> {
    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let args = Args::parse();

    let default_level = if args.silent { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = args.into_config(command_line);
    prophasm::pipeline::run(&config)?;
    Ok(())
}
