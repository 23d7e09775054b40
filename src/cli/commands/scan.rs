use anyhow::Result;

use super::{
    CommandResult, CommandSummary,
    helper::{finish, read_source},
};
use crate::{
    cli::{args::ScanCommand, exit_status::ExitStatus},
    core::{Localizer, RunContext},
    issues::Issue,
};

/// Lists literals that `localize` would rewrite. Fails when any remain.
pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let ctx = RunContext::new(&cmd.args.common)?;
    let dictionary = ctx.load_dictionary()?;
    let localizer = Localizer::new(&ctx.config, &dictionary, false)?;

    let mut issues = Vec::new();
    for file in &ctx.files {
        let Some(content) = read_source(&ctx, file, &mut issues) else {
            continue;
        };
        issues.extend(localizer.localizable(file, &content));
    }

    let exit_status = if issues.iter().any(|i| matches!(i, Issue::Localizable(_))) {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    };
    Ok(finish(CommandSummary::Scan, issues, &ctx, exit_status))
}
