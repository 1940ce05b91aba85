//! md2html CLI - Markdown to HTML converter.
//!
//! Converts markdown files into standalone HTML pages, writes them to the
//! output directory and uploads them to S3-compatible storage.

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use output::Output;

/// md2html - Markdown to HTML converter.
#[derive(Parser)]
#[command(name = "md2html", version, about)]
struct Cli {
    #[command(flatten)]
    args: ConvertArgs,
}

/// `--verbose` forces INFO; otherwise `RUST_LOG`, falling back to WARN.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.args.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
