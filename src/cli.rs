use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Solcadre solar calendar.
#[derive(Parser)]
#[command(
    name = "solcadre",
    version,
    about = "Dates in a calendar of sunrise-bounded days, seasons and solstice/equinox transitions"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Latitude used for sunrise/sunset (default: Sydney, Australia).
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude used for sunrise/sunset (default: Sydney, Australia).
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// IANA time zone used to display times (default: the system time zone).
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Show the date at this time (RFC 3339, or local `YYYY-MM-DDTHH:MM[:SS]`)
    /// instead of now.
    #[arg(short, long, global = true)]
    pub time: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Display a calendar of the current and following blocks, marking today
    /// and days with a solstice or equinox.
    Calendar(CalendarArgs),
}

/// Arguments for the `calendar` subcommand.
#[derive(clap::Args)]
pub struct CalendarArgs {
    /// Number of blocks (seasons or transitions) to display.
    #[arg(short, long, default_value_t = 3)]
    pub blocks: usize,
}
