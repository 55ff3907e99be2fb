use crate::error::{GaragectlError, Result};
use crate::probe::{ProbeOutcome, ShellProbe};
use crate::runtime::docker::container_state;
use crate::runtime::CommandRunner;
use crate::settings::Settings;
use std::time::Duration;

/// Fail with [`GaragectlError::NotRunning`] unless the container is up.
pub fn ensure_running<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<()> {
    if container_state(runner, &settings.container_name)?.is_running() {
        Ok(())
    } else {
        Err(GaragectlError::NotRunning(settings.container_name.clone()))
    }
}

/// Run `garage <args>` in the managed container through the shell probe.
pub fn garage<R: CommandRunner, S: AsRef<str>>(
    runner: &R,
    settings: &Settings,
    args: &[S],
) -> Result<ProbeOutcome> {
    ShellProbe::new(runner, &settings.container_name).exec(args)
}

/// Give garage time to finish starting inside a fresh container.
pub fn wait_for_startup<R: CommandRunner>(runner: &R, settings: &Settings) {
    if settings.startup_delay_secs > 0 {
        runner.sleep(Duration::from_secs(settings.startup_delay_secs));
    }
}

pub fn require_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GaragectlError::Input(format!("{} name cannot be empty", kind)));
    }
    Ok(name.to_string())
}

/// Bucket names follow S3 rules: 3-63 chars of lowercase letters, digits, `-` and `.`,
/// starting and ending with a letter or digit.
pub fn validate_bucket_name(name: &str) -> Result<String> {
    let name = require_name("Bucket", name)?;
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = name
        .chars()
        .next()
        .zip(name.chars().last())
        .map(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric())
        .unwrap_or(false);

    if !(3..=63).contains(&name.len()) || !valid_chars || !valid_edges {
        return Err(GaragectlError::Input(format!(
            "Invalid bucket name '{}': use 3-63 lowercase letters, digits, '-' or '.'",
            name
        )));
    }
    Ok(name)
}
