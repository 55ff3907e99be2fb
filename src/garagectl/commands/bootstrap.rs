//! Single-node cluster bootstrap: assign the node a role in the layout and commit it.

use crate::commands::helpers::{ensure_running, garage};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GaragectlError, Result};
use crate::runtime::CommandRunner;
use crate::settings::Settings;
use std::time::Duration;

const LAYOUT_VERSION_PREFIX: &str = "Current cluster layout version:";

pub fn run<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    ensure_running(runner, settings)?;
    let mut result = CmdResult::default();

    let node_id = fetch_node_id(runner, settings)?;
    result.add_message(CmdMessage::info(format!("Node ID: {}", node_id)));

    let layout = garage(runner, settings, &["layout", "show"])?;
    let version = parse_layout_version(&layout.output.stdout);
    log::debug!("current layout version {}", version);

    let assign = garage(
        runner,
        settings,
        &[
            "layout",
            "assign",
            "-z",
            settings.zone.as_str(),
            "-c",
            settings.capacity.as_str(),
            node_id.as_str(),
        ],
    )?;
    result.add_output(assign.output.stdout);

    let next = (version + 1).to_string();
    let apply = garage(
        runner,
        settings,
        &["layout", "apply", "--version", next.as_str()],
    )?;
    result.add_output(apply.output.stdout);

    result.add_message(CmdMessage::success(format!(
        "Layout version {} applied (zone {}, capacity {})",
        next, settings.zone, settings.capacity
    )));
    result.node_id = Some(node_id);
    Ok(result)
}

/// `garage node id -q`, retried once after the retry delay.
pub fn fetch_node_id<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<String> {
    let outcome = match garage(runner, settings, &["node", "id", "-q"]) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("node id not available yet: {}", e);
            runner.sleep(Duration::from_secs(settings.retry_delay_secs));
            garage(runner, settings, &["node", "id", "-q"])?
        }
    };

    parse_node_id(&outcome.output.stdout).ok_or_else(|| {
        GaragectlError::Command(format!(
            "Unexpected output from 'garage node id': {}",
            outcome.output.stdout.trim()
        ))
    })
}

/// Node identifier from `<hex id>@<addr>`.
pub fn parse_node_id(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let id = line.split('@').next()?.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(id.to_string())
    } else {
        None
    }
}

/// Layout version from `garage layout show`, 0 when none is reported.
pub fn parse_layout_version(output: &str) -> u64 {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix(LAYOUT_VERSION_PREFIX))
        .and_then(|rest| rest.trim().parse().ok())
        .unwrap_or(0)
}
