//! Command-line interface: argument parsing, command dispatch and
//! user-facing output.

pub mod args;
mod commands;
mod exit_status;
mod report;
mod run;

use anyhow::Result;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;
pub use report::{FAILURE_MARK, SUCCESS_MARK, report, report_to};

use crate::logging::{LogLevel, init_with_level};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };
    init_with_level(LogLevel::from_verbose(args.verbose()));

    let result = run::run(args)?;
    report::print(&result);

    Ok(result.exit_status)
}
