use std::{fs, path::Path};

use anyhow::Result;

use super::{CommandResult, CommandSummary, InitSummary};
use crate::{
    cli::exit_status::ExitStatus,
    config::{CONFIG_FILE_NAME, default_config_json},
};

pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    let created = !config_path.exists();
    if created {
        fs::write(config_path, default_config_json()? + "\n")?;
    }

    Ok(CommandResult {
        summary: CommandSummary::Init(InitSummary { created }),
        issues: Vec::new(),
        source_files_checked: 0,
        skipped_count: 0,
        exit_status: if created {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        },
    })
}
