use crate::commands::helpers::{ensure_running, garage, require_name, validate_bucket_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GaragectlError, Result};
use crate::runtime::CommandRunner;
use crate::settings::Settings;

/// Access flags for `bucket allow` / `bucket deny`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
    pub owner: bool,
}

impl Permissions {
    pub fn read_write() -> Self {
        Self {
            read: true,
            write: true,
            owner: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.read || self.write || self.owner)
    }

    fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.read {
            flags.push("--read");
        }
        if self.write {
            flags.push("--write");
        }
        if self.owner {
            flags.push("--owner");
        }
        flags
    }

    fn describe(&self) -> String {
        self.flags()
            .iter()
            .map(|f| f.trim_start_matches('-'))
            .collect::<Vec<_>>()
            .join("+")
    }
}

pub fn create<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = validate_bucket_name(name)?;
    ensure_running(runner, settings)?;
    let outcome = garage(runner, settings, &["bucket", "create", name.as_str()])?;

    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    result.add_message(CmdMessage::success(format!("Bucket '{}' created", name)));
    Ok(result)
}

pub fn list<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    ensure_running(runner, settings)?;
    let outcome = garage(runner, settings, &["bucket", "list"])?;
    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    Ok(result)
}

pub fn info<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = require_name("Bucket", name)?;
    ensure_running(runner, settings)?;
    let outcome = garage(runner, settings, &["bucket", "info", name.as_str()])?;
    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    Ok(result)
}

pub fn delete<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = require_name("Bucket", name)?;
    ensure_running(runner, settings)?;
    garage(runner, settings, &["bucket", "delete", "--yes", name.as_str()])?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Bucket '{}' deleted", name)));
    Ok(result)
}

/// Grant `key` the given permissions on `bucket`.
pub fn allow<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    bucket: &str,
    key: &str,
    permissions: Permissions,
) -> Result<CmdResult> {
    change_access(runner, settings, "allow", bucket, key, permissions)
}

/// Revoke the given permissions of `key` on `bucket`.
pub fn deny<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    bucket: &str,
    key: &str,
    permissions: Permissions,
) -> Result<CmdResult> {
    change_access(runner, settings, "deny", bucket, key, permissions)
}

fn change_access<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    verb: &str,
    bucket: &str,
    key: &str,
    permissions: Permissions,
) -> Result<CmdResult> {
    let bucket = require_name("Bucket", bucket)?;
    let key = require_name("Key", key)?;
    if permissions.is_empty() {
        return Err(GaragectlError::Input(
            "Select at least one of read, write or owner".to_string(),
        ));
    }
    ensure_running(runner, settings)?;

    let mut args = vec!["bucket", verb];
    args.extend(permissions.flags());
    args.extend([bucket.as_str(), "--key", key.as_str()]);
    let outcome = garage(runner, settings, &args)?;

    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    let action = if verb == "allow" { "granted to" } else { "revoked from" };
    result.add_message(CmdMessage::success(format!(
        "{} on '{}' {} key '{}'",
        permissions.describe(),
        bucket,
        action,
        key
    )));
    Ok(result)
}
