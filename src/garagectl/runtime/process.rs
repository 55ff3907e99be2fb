use super::{CommandRunner, ExecOutput};
use crate::error::{GaragectlError, Result};
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

/// Runs real processes on the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        log::debug!("exec: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| GaragectlError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = ExecOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::trace!("exit status {:?} for {}", result.status, program);
        Ok(result)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn sleep(&self, duration: Duration) {
        log::debug!("sleeping {:?}", duration);
        std::thread::sleep(duration);
    }
}
