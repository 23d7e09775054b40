use anyhow::{Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, init::init, localize::localize, repair::repair, restore::restore,
        scan::scan,
    },
};

/// Dispatches to the command handler for the parsed arguments.
///
/// # Returns
/// - `Ok(CommandResult)` with review items and the exit status
/// - `Err` on fatal errors (config, dictionary or source root)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Localize(cmd)) => localize(cmd),
        Some(Command::Scan(cmd)) => scan(cmd),
        Some(Command::Repair(cmd)) => repair(cmd),
        Some(Command::Restore(cmd)) => restore(cmd),
        Some(Command::Init) => init(),
        None => bail!("No command provided. Use --help to see available commands."),
    }
}
