use anyhow::Result;

use super::{
    CommandResult, CommandSummary, RepairSummary,
    helper::{file_error, finish, read_source, write_source},
};
use crate::{
    cli::{args::RepairCommand, exit_status::ExitStatus},
    core::{RunContext, pipeline::Repairer, repair::RepairGroups},
    issues::Issue,
};

/// Runs the import fixer and repair passes over the project. Fails when a
/// site is left unrepaired.
pub fn repair(cmd: RepairCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = RunContext::new(&args.common)?;
    let groups = RepairGroups {
        constness: !args.no_const,
        context: !args.no_context,
    };
    let repairer = Repairer::new(&ctx.config, !args.no_imports, groups)?;
    let backup = args.backup.then(|| ctx.backup());

    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut backup_count = 0;
    for file in &ctx.files {
        let Some(content) = read_source(&ctx, file, &mut issues) else {
            continue;
        };
        let outcome = repairer.process(file, &content);
        issues.extend(outcome.issues);

        let Some(new_content) = outcome.content else {
            continue;
        };
        if !args.dry_run {
            match write_source(&ctx, backup.as_ref(), file, &new_content) {
                Ok(backed_up) => backup_count += usize::from(backed_up),
                Err(err) => {
                    issues.push(file_error(file, format!("{:#}", err)));
                    continue;
                }
            }
        }
        records.push(outcome.record);
    }

    let exit_status = if issues.iter().any(|i| matches!(i, Issue::Unrepaired(_))) {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    };
    let summary = RepairSummary {
        is_dry_run: args.dry_run,
        records,
        backup_count,
    };
    Ok(finish(
        CommandSummary::Repair(summary),
        issues,
        &ctx,
        exit_status,
    ))
}
