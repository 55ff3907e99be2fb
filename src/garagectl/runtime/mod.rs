//! # Process Layer
//!
//! Every external program this tool touches (`docker`, the compose tool, and the
//! garage binary inside the container) is reached through the [`CommandRunner`]
//! trait. Nothing above this layer spawns processes directly.
//!
//! ## Implementations
//!
//! - [`process::SystemRunner`]: spawns real processes with `std::process::Command`
//!   and resolves tools on `$PATH` with `which`.
//! - [`memory::ScriptedRunner`]: in-memory runner for tests
//!   - Records every invocation and every requested sleep
//!   - Answers from a list of scripted responses
//!
//! Sleeping is part of the trait so that the fixed start-up and retry delays can be
//! asserted in tests without actually waiting.

use crate::error::Result;
use std::path::PathBuf;
use std::time::Duration;

pub mod docker;
pub mod memory;
pub mod process;

/// Exit code reported by shells when a command cannot be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr, trimmed. Used when both streams carry output
    /// meant for the user (e.g. `docker logs`).
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }

    /// Short description of why the command failed.
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.status {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Abstract interface for running external programs.
pub trait CommandRunner {
    /// Run `program` with `args` to completion, capturing its output.
    ///
    /// A non-zero exit is *not* an error at this level; only failing to spawn the
    /// process is.
    fn run(&self, program: &str, args: &[String]) -> Result<ExecOutput>;

    /// Resolve a program on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Block for the given duration.
    fn sleep(&self, duration: Duration);
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        (**self).run(program, args)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        (**self).locate(program)
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Turn a list of string-like values into owned arguments.
pub fn to_args<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter().map(|a| a.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_both_streams() {
        let out = ExecOutput {
            status: Some(0),
            stdout: "out\n".into(),
            stderr: "err\n".into(),
        };
        assert_eq!(out.combined(), "out\nerr");
    }

    #[test]
    fn failure_reason_falls_back_to_status() {
        let out = ExecOutput::failed(3, "  ");
        assert_eq!(out.failure_reason(), "exited with status 3");
        assert_eq!(ExecOutput::failed(1, "boom\n").failure_reason(), "boom");
    }
}
