//! Command-line V0 finder.
//!
//! Reads one event from JSON and writes the K-short, Lambda and D0
//! candidate collections, with the cut flow, as JSON.
#![allow(clippy::uninlined_format_args)]

mod event;

use clap::{Parser, Subcommand};
use event::{load_config, Event};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use v0fit_algorithms::{V0FitStatistics, V0Fitter};
use v0fit_core::{V0Collections, V0FitterConfig};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] v0fit_core::Error),
}

/// Two-track V0 reconstruction (K-short, Lambda, D0).
#[derive(Parser)]
#[command(name = "v0fit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find V0 candidates in an event file
    Fit {
        /// Input event (JSON)
        input: PathBuf,

        /// Fitter configuration (JSON); absent keys keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file; stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about an event file
    Info {
        /// Input event (JSON)
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct FitReport<'a> {
    fitter: &'static str,
    candidates: &'a V0Collections,
    statistics: &'a V0FitStatistics,
}

fn fit(input: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => V0FitterConfig::default(),
    };
    let event = Event::load(input)?;
    let field = event.field();
    let fitter = V0Fitter::new(config)?;

    let start = Instant::now();
    let (candidates, statistics) = fitter.fit_all_with_statistics(&event.as_input(&field))?;
    log::info!(
        "{} candidates from {} tracks in {:.2?}",
        candidates.len(),
        event.tracks.len(),
        start.elapsed()
    );

    let report = FitReport {
        fitter: fitter.vertex_fitter_name(),
        candidates: &candidates,
        statistics: &statistics,
    };
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, &report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn info(input: &Path) -> Result<()> {
    let event = Event::load(input)?;
    let (positive, negative) = event.charge_counts();
    let bs = &event.beamspot;
    println!("Event: {}", input.display());
    println!("  Field:            {} T", event.bz);
    println!(
        "  Beamspot:         ({:.4}, {:.4}, {:.4}) cm, slopes ({:.2e}, {:.2e})",
        bs.position.x, bs.position.y, bs.position.z, bs.dxdz, bs.dydz
    );
    println!("  Primary vertices: {}", event.primary_vertices.len());
    println!(
        "  Tracks:           {} ({} positive, {} negative)",
        event.tracks.len(),
        positive,
        negative
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match &cli.command {
        Commands::Fit {
            input,
            config,
            output,
        } => fit(input, config.as_deref(), output.as_deref()),
        Commands::Info { input } => info(input),
    }
}
