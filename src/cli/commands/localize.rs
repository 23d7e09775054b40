use anyhow::Result;

use super::{
    CommandResult, CommandSummary, LocalizeSummary,
    helper::{file_error, finish, read_source, write_source},
};
use crate::{
    cli::{args::LocalizeCommand, exit_status::ExitStatus},
    core::{Localizer, RunContext, pipeline::missing_translations},
    report::{AuditReport, write_reports},
};

/// Rewrites every file of the project. Review items never fail the run.
pub fn localize(cmd: LocalizeCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = RunContext::new(&args.common)?;
    let dictionary = ctx.load_dictionary()?;
    let target = ctx.load_target_dictionary()?;
    tracing::debug!(
        "Loaded {} message(s) from {}",
        dictionary.len(),
        dictionary.file_path()
    );

    let localizer = Localizer::new(&ctx.config, &dictionary, args.repair)?;
    let backup = args.backup.then(|| ctx.backup());

    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut backup_count = 0;
    for file in &ctx.files {
        let Some(content) = read_source(&ctx, file, &mut issues) else {
            continue;
        };
        let outcome = localizer.process(file, &content);
        issues.extend(outcome.issues);

        if let Some(new_content) = outcome.content
            && !args.dry_run
        {
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

    if let Some(target) = &target {
        issues.extend(missing_translations(&records, target));
    }

    let report = AuditReport::new(args.dry_run, ctx.files.len(), &records, &issues);
    let report_paths = if args.no_report {
        None
    } else {
        Some(write_reports(&ctx.report_dir(), &report, &records)?)
    };

    records.retain(|record| record.is_modified());
    let summary = LocalizeSummary {
        is_dry_run: args.dry_run,
        totals: report.summary,
        records,
        backup_count,
        report_paths,
    };
    Ok(finish(
        CommandSummary::Localize(summary),
        issues,
        &ctx,
        ExitStatus::Success,
    ))
}
