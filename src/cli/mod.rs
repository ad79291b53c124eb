//! CLI module for habitrack
//!
//! Provides command-line access to the engines:
//! - field-columns / check-columns: field value engine
//! - normalize-schedule / next-due: schedule engine
//! - tracker / seed: tracker normalization and reminder planning

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_columns, field_columns, next_due, run_command, schedule, seed, tracker};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};

use crate::observability::{log_event_with_fields, Event};

/// Parse arguments and run the selected command.
///
/// Failures are also written to stdout as an error response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let name = cli.command.name();

    log_event_with_fields(Event::CommandStart, &[("command", name)]);

    match run_command(cli.command) {
        Ok(()) => {
            log_event_with_fields(Event::CommandComplete, &[("command", name)]);
            Ok(())
        }
        Err(e) => {
            log_event_with_fields(
                Event::CommandFailed,
                &[("code", e.code_str()), ("command", name)],
            );
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}
