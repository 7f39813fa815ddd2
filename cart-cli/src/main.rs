//! Cart repair tool
//!
//! Runs one repair pass over the cart stored in a local-storage dump file and
//! prints the resulting report as JSON.
//!
//! Usage:
//!   cart-repair --store ./local-storage.json [--key cart] [--dry-run]

mod cli;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

use crate::cli::{exit_code, Args};

fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose, args.json_logs);

    let report = args.run()?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.success {
        eprintln!("{} {}", "✔".bright_green(), report.message);
    } else {
        eprintln!(
            "{} {}: {}",
            "✘".bright_red(),
            report.message,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(exit_code(&report))
}

fn init_tracing(verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cart_repair={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr);

    if json {
        builder.json().with_target(false).init();
    } else {
        builder.with_target(true).init();
    }
}
