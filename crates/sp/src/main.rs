//! SP CLI - Static page fragments.
//!
//! Provides commands for:
//! - `fragment`: Print one fragment of a static page
//! - `pages`: List the pages of a group available for given dimensions

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FragmentArgs, GlobalArgs, PagesArgs};
use output::Output;

/// SP - Static page fragments.
#[derive(Parser)]
#[command(name = "sp", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one fragment of a static page.
    Fragment(FragmentArgs),
    /// List the pages of a group as JSON options.
    Pages(PagesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fragment(args) => args.execute(&cli.global, &output),
        Commands::Pages(args) => args.execute(&cli.global, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
