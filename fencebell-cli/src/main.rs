//! Fencebell CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Fencebell library.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::check::{self, CheckArgs};
use commands::config::{self, ConfigCommands};
use commands::list::{self, ListArgs};
use commands::run::{self, RunArgs};

/// Arrival alerts for saved locations.
#[derive(Parser)]
#[command(name = "fencebell", version = fencebell::VERSION)]
#[command(about = "Arrival alerts for saved locations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a position stream and ring alerts on arrival
    Run {
        /// Geofence records JSON file
        #[arg(long, value_name = "FILE")]
        records: PathBuf,

        /// Replay positions from a file instead of reading stdin
        #[arg(long, value_name = "FILE")]
        replay: Option<PathBuf>,

        /// Milliseconds between replayed positions
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Override the alert window in minutes
        #[arg(long)]
        window: Option<u32>,

        /// Track transitions without ringing alerts
        #[arg(long)]
        quiet_alerts: bool,

        /// Append logs to this file instead of stderr
        #[arg(long, value_name = "FILE")]
        log_file: Option<PathBuf>,
    },

    /// Evaluate a single position against the records and exit
    Check {
        /// Geofence records JSON file
        #[arg(long, value_name = "FILE")]
        records: PathBuf,

        /// Latitude of the position to check
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the position to check
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Clock time to evaluate at (HH:MM:SS, defaults to now)
        #[arg(long, value_name = "TIME")]
        at: Option<String>,

        /// Override the alert window in minutes
        #[arg(long)]
        window: Option<u32>,
    },

    /// List the records in a feed file
    List {
        /// Geofence records JSON file
        #[arg(long, value_name = "FILE")]
        records: PathBuf,

        /// Latitude for distance display
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude for distance display
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            records,
            replay,
            interval_ms,
            window,
            quiet_alerts,
            log_file,
        } => run::run(RunArgs {
            records,
            replay,
            window,
            quiet_alerts,
            interval_ms,
            log_file,
        }),
        Commands::Check {
            records,
            lat,
            lon,
            at,
            window,
        } => check::run(CheckArgs {
            records,
            lat,
            lon,
            at,
            window,
        }),
        Commands::List { records, lat, lon } => list::run(ListArgs { records, lat, lon }),
        Commands::Config { command } => config::run(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
