use crate::commands::lifecycle::remove_container;
use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::runtime::CommandRunner;
use crate::settings::Settings;
use std::fs;
use std::path::Path;

/// Remove the container and delete everything setup generated, data included.
///
/// Tool settings (`garagectl.json`) survive so the next setup reuses them.
pub fn run<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    remove_container(runner, workspace, settings, true, &mut result)?;

    for file in [workspace.config_file(), workspace.compose_file()] {
        remove_path(&file, &mut result)?;
    }
    for dir in [workspace.meta_dir(), workspace.data_dir()] {
        remove_path(&dir, &mut result)?;
    }

    result.add_message(CmdMessage::success("Cleanup complete"));
    Ok(result)
}

fn remove_path(path: &Path, result: &mut CmdResult) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else if path.exists() {
        fs::remove_file(path)?;
    } else {
        return Ok(());
    }
    log::info!("removed {}", path.display());
    result.add_message(CmdMessage::info(format!("Deleted {}", path.display())));
    Ok(())
}
