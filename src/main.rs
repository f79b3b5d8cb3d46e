use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, esummary::EsummaryClient};

mod cli;
mod date;
mod envelope;
mod esummary;
mod filter;
mod identifier;

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut raw = Vec::new();
    io::stdin()
        .read_to_end(&mut raw)
        .context("failed to read search results from stdin")?;

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let client = EsummaryClient::new(args.endpoint);
    let outcome = envelope::process(&raw, args.days, today, &client);

    println!("{}", outcome.render().context("failed to serialise output")?);

    if let Some((kept, removed)) = outcome.counts {
        eprintln!(
            "{} {}",
            format!("✓ {kept}").if_supports_color(Stream::Stderr, |t| t.green()),
            format!("✗ {removed}").if_supports_color(Stream::Stderr, |t| t.red()),
        );
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Logs go to stderr so stdout stays a single JSON document. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
