//! CLI argument definitions using clap
//!
//! Commands:
//! - habitrack field-columns --config <path>
//! - habitrack check-columns --config <path>
//! - habitrack normalize-schedule --config <path>
//! - habitrack next-due --config <path> [--now <rfc3339>]
//! - habitrack tracker --config <path> [--now <rfc3339>]
//! - habitrack seed --config <path> [--now <rfc3339>]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// habitrack - typed habit fields and reminder schedules
#[derive(Parser, Debug)]
#[command(name = "habitrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a field value and print its storage columns
    FieldColumns {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate stored columns and print the value they hold
    CheckColumns {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Normalize a reminder schedule
    NormalizeSchedule {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute the next due instant of a schedule
    NextDue {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Normalize a tracker draft and plan its first reminder
    Tracker {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Print the built-in trackers, normalized
    Seed {
        /// Path to configuration file [default: ./habitrack.json]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reference instant (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::FieldColumns { .. } => "field-columns",
            Command::CheckColumns { .. } => "check-columns",
            Command::NormalizeSchedule { .. } => "normalize-schedule",
            Command::NextDue { .. } => "next-due",
            Command::Tracker { .. } => "tracker",
            Command::Seed { .. } => "seed",
        }
    }

    /// Config path and whether the user named it
    pub fn config_path(&self) -> (&Path, bool) {
        let config = match self {
            Command::FieldColumns { config }
            | Command::CheckColumns { config }
            | Command::NormalizeSchedule { config }
            | Command::NextDue { config, .. }
            | Command::Tracker { config, .. }
            | Command::Seed { config, .. } => config,
        };

        match config {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
