use crate::commands::helpers::wait_for_startup;
use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::{GaragectlError, Result};
use crate::garage_config::{
    CONTAINER_CONFIG_PATH, CONTAINER_DATA_DIR, CONTAINER_META_DIR, CONTAINER_PORTS,
};
use crate::runtime::docker::{compose, container_state, docker, ContainerState};
use crate::runtime::CommandRunner;
use crate::settings::{DeployMode, Settings};

pub fn start<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
) -> Result<CmdResult> {
    if !workspace.config_file().exists() {
        return Err(GaragectlError::Input(
            "garage.toml not found, run setup first".to_string(),
        ));
    }

    let mut result = CmdResult::default();
    match settings.mode {
        DeployMode::Compose => {
            let compose_file = require_compose_file(workspace)?;
            let out = compose(runner, &compose_file, &["up", "-d"])?;
            result.add_output(out.combined());
        }
        DeployMode::Standalone => match container_state(runner, &settings.container_name)? {
            ContainerState::Running => {
                result.add_message(CmdMessage::info(format!(
                    "Container '{}' is already running",
                    settings.container_name
                )));
                return Ok(result);
            }
            ContainerState::Stopped(_) => {
                docker(runner, &["start", settings.container_name.as_str()])?;
            }
            ContainerState::Missing => {
                let out = docker(runner, &run_args(workspace, settings))?;
                result.add_output(out.stdout);
            }
        },
    }

    wait_for_startup(runner, settings);
    result.add_message(CmdMessage::success(format!(
        "Container '{}' started",
        settings.container_name
    )));
    Ok(result)
}

pub fn stop<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match settings.mode {
        DeployMode::Compose => {
            let compose_file = require_compose_file(workspace)?;
            compose(runner, &compose_file, &["stop"])?;
        }
        DeployMode::Standalone => {
            if container_state(runner, &settings.container_name)? == ContainerState::Missing {
                result.add_message(CmdMessage::warning(format!(
                    "Container '{}' does not exist",
                    settings.container_name
                )));
                return Ok(result);
            }
            docker(runner, &["stop", settings.container_name.as_str()])?;
        }
    }
    result.add_message(CmdMessage::success(format!(
        "Container '{}' stopped",
        settings.container_name
    )));
    Ok(result)
}

pub fn restart<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
) -> Result<CmdResult> {
    match settings.mode {
        DeployMode::Compose => {
            let compose_file = require_compose_file(workspace)?;
            compose(runner, &compose_file, &["restart"])?;
        }
        DeployMode::Standalone => {
            docker(runner, &["restart", settings.container_name.as_str()])?;
        }
    }
    wait_for_startup(runner, settings);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Container '{}' restarted",
        settings.container_name
    )));
    Ok(result)
}

/// Remove the container only; configuration and data stay on disk.
pub fn remove<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    remove_container(runner, workspace, settings, false, &mut result)?;
    result.add_message(CmdMessage::info(format!(
        "Configuration and data kept in {}",
        workspace.root().display()
    )));
    Ok(result)
}

pub fn pull<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    let out = docker(runner, &["pull", settings.image.as_str()])?;
    let mut result = CmdResult::default();
    result.add_output(out.stdout);
    result.add_message(CmdMessage::success(format!("Pulled {}", settings.image)));
    Ok(result)
}

/// Shared by `remove` and destructive cleanup; `volumes` also drops compose volumes.
pub(crate) fn remove_container<R: CommandRunner>(
    runner: &R,
    workspace: &Workspace,
    settings: &Settings,
    volumes: bool,
    result: &mut CmdResult,
) -> Result<()> {
    let compose_file = workspace.compose_file();
    if settings.mode == DeployMode::Compose && compose_file.exists() {
        let args: &[&str] = if volumes { &["down", "-v"] } else { &["down"] };
        compose(runner, &compose_file, args)?;
        result.add_message(CmdMessage::success("Compose services removed"));
        return Ok(());
    }

    if container_state(runner, &settings.container_name)? == ContainerState::Missing {
        result.add_message(CmdMessage::info(format!(
            "No container named '{}'",
            settings.container_name
        )));
        return Ok(());
    }
    docker(runner, &["rm", "-f", settings.container_name.as_str()])?;
    result.add_message(CmdMessage::success(format!(
        "Container '{}' removed",
        settings.container_name
    )));
    Ok(())
}

fn require_compose_file(workspace: &Workspace) -> Result<std::path::PathBuf> {
    let path = workspace.compose_file();
    if path.exists() {
        Ok(path)
    } else {
        Err(GaragectlError::Input(
            "docker-compose.yml not found, run setup first".to_string(),
        ))
    }
}

/// Arguments for `docker run` in standalone mode.
fn run_args(workspace: &Workspace, settings: &Settings) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        settings.container_name.clone(),
        "--restart".to_string(),
        "unless-stopped".to_string(),
    ];

    let base = settings.port_base();
    for (offset, port) in CONTAINER_PORTS.iter().enumerate() {
        args.push("-p".to_string());
        args.push(format!("{}:{}", base + offset as u16, port));
    }

    let mounts = [
        (workspace.config_file(), CONTAINER_CONFIG_PATH),
        (workspace.meta_dir(), CONTAINER_META_DIR),
        (workspace.data_dir(), CONTAINER_DATA_DIR),
    ];
    for (host, container) in mounts {
        args.push("-v".to_string());
        args.push(format!("{}:{}", host.display(), container));
    }

    args.push(settings.image.clone());
    args
}
