mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, clean, sanitize, ApplyArgs, CleanArgs, SanitizeArgs};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Richedit CLI - sanitize, clean and script edits of rich-text markup
#[derive(Parser, Debug)]
#[command(name = "richedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to richedit.config.json in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip disallowed tags, attributes and embeds from markup files
    Sanitize(SanitizeArgs),

    /// Remove attributes, empty elements and inline formatting
    Clean(CleanArgs),

    /// Replay a JSON command script over a markup file
    Apply(ApplyArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();
    let config = Config::load(&cwd, cli.config.as_deref())?;

    match cli.command {
        Command::Sanitize(args) => sanitize(args, &config),
        Command::Clean(args) => clean(args, &config),
        Command::Apply(args) => apply(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
