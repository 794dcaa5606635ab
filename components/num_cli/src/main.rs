//! Corten numeric runtime CLI
//!
//! Entry point for the calculator. Parses CLI arguments and delegates to the
//! Runtime for evaluation.

use clap::Parser as ClapParser;
use num_cli::{Cli, CliResult, Runtime};
use tracing_subscriber::filter::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let runtime = Runtime::from_cli(cli)?;
    let outcome = runtime.evaluate(&cli.lhs, cli.op, cli.rhs.as_deref())?;
    for line in &outcome.lines {
        println!("{line}");
    }
    if cli.stats {
        println!("{}", outcome.stats_json()?);
    }
    Ok(())
}
