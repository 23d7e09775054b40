use anyhow::Result;

use super::{CommandResult, CommandSummary, RestoreSummary, helper::finish};
use crate::{
    cli::{args::RestoreCommand, exit_status::ExitStatus},
    core::RunContext,
};

/// Copies every backed-up file back and removes the backup directory.
pub fn restore(cmd: RestoreCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.args.common)?;
    let backup = ctx.backup();
    let restored = backup.restore_all()?;

    let summary = RestoreSummary {
        backup_dir: ctx.config.backup_dir.clone(),
        restored,
    };
    Ok(finish(
        CommandSummary::Restore(summary),
        Vec::new(),
        &ctx,
        ExitStatus::Success,
    ))
}
