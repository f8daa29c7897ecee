mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{annotate, diff, AnnotateArgs, DiffArgs};
use tracing_subscriber::EnvFilter;

/// Proofmark CLI - word-level correction markup for rich-text documents
#[derive(Parser, Debug)]
#[command(name = "proofmark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annotate a document with the changes in a corrected text
    Annotate(AnnotateArgs),

    /// Show the word diff between a document and a corrected text
    Diff(DiffArgs),
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Annotate(args) => annotate(args, &cwd),
                Command::Diff(args) => diff(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
