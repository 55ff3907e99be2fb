//! # Shell Probe
//!
//! Garage images differ in what they ship: the official image is a bare binary at
//! `/garage` with no shell at all, while derived images put the binary on a regular
//! path and bring `sh`, `bash` or busybox along. [`ShellProbe`] hides that by trying
//! a fixed, ordered set of shells and install paths until one combination exits
//! successfully.
//!
//! ```text
//! for shell in SHELL_CANDIDATES that exist in the container:
//!     for binary in BINARY_CANDIDATES:
//!         docker exec <c> <shell> -c '<binary> <args>'     -> first success wins
//! if no shell exists:
//!     for binary in BINARY_CANDIDATES:
//!         docker exec <c> <binary> <args...>               -> first success wins
//! ```
//!
//! The search is first-match-wins: once a combination succeeds no later combination
//! is attempted. When everything fails the caller gets
//! [`GaragectlError::ProbeExhausted`], whose message carries troubleshooting hints.
//! The error it reports is the first one from a binary that actually ran (exit
//! status other than 127), so garage's own complaint is not buried under the
//! "not found" noise of the remaining candidates.

use crate::error::{GaragectlError, Result};
use crate::runtime::docker::DOCKER;
use crate::runtime::{to_args, CommandRunner, ExecOutput, EXIT_NOT_FOUND};

pub const SHELL_CANDIDATES: &[&str] = &["/bin/sh", "/bin/bash", "/bin/ash", "/busybox/sh"];

pub const BINARY_CANDIDATES: &[&str] = &[
    "/garage",
    "/usr/local/bin/garage",
    "/usr/bin/garage",
    "/bin/garage",
];

/// The combination that worked, and what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// `None` when the binary was executed directly.
    pub shell: Option<String>,
    pub binary: String,
    pub output: ExecOutput,
}

pub struct ShellProbe<'a, R: CommandRunner> {
    runner: &'a R,
    container: &'a str,
    shells: &'a [&'a str],
    binaries: &'a [&'a str],
}

impl<'a, R: CommandRunner> ShellProbe<'a, R> {
    pub fn new(runner: &'a R, container: &'a str) -> Self {
        Self {
            runner,
            container,
            shells: SHELL_CANDIDATES,
            binaries: BINARY_CANDIDATES,
        }
    }

    pub fn with_candidates(mut self, shells: &'a [&'a str], binaries: &'a [&'a str]) -> Self {
        self.shells = shells;
        self.binaries = binaries;
        self
    }

    /// Run `garage <args>` inside the container.
    pub fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<ProbeOutcome> {
        let args = to_args(args);
        let script_args = args
            .iter()
            .map(|a| shell_quote(a))
            .collect::<Vec<_>>()
            .join(" ");

        let mut attempts = 0;
        let mut failures = Failures::default();
        let mut found_shell = false;

        for shell in self.shells {
            if !self.shell_exists(shell)? {
                log::debug!("{}: no shell at {}", self.container, shell);
                continue;
            }
            found_shell = true;

            for binary in self.binaries {
                attempts += 1;
                let script = if script_args.is_empty() {
                    binary.to_string()
                } else {
                    format!("{} {}", binary, script_args)
                };
                let exec = to_args(&["exec", self.container, shell, "-c", &script]);
                let output = self.runner.run(DOCKER, &exec)?;
                if output.success() {
                    log::debug!("{}: ran via {} {}", self.container, shell, binary);
                    return Ok(ProbeOutcome {
                        shell: Some(shell.to_string()),
                        binary: binary.to_string(),
                        output,
                    });
                }
                failures.record(&output);
            }
        }

        if !found_shell {
            log::debug!("{}: no shell found, executing directly", self.container);
            for binary in self.binaries {
                attempts += 1;
                let mut exec = to_args(&["exec", self.container, binary]);
                exec.extend(args.iter().cloned());
                let output = self.runner.run(DOCKER, &exec)?;
                if output.success() {
                    return Ok(ProbeOutcome {
                        shell: None,
                        binary: binary.to_string(),
                        output,
                    });
                }
                failures.record(&output);
            }
        }

        Err(GaragectlError::ProbeExhausted {
            container: self.container.to_string(),
            attempts,
            last_error: failures.into_reason(),
        })
    }

    fn shell_exists(&self, shell: &str) -> Result<bool> {
        let check = to_args(&["exec", self.container, shell, "-c", "exit 0"]);
        Ok(self.runner.run(DOCKER, &check)?.success())
    }
}

#[derive(Default)]
struct Failures {
    first_ran: Option<String>,
    last: Option<String>,
}

impl Failures {
    fn record(&mut self, output: &ExecOutput) {
        let reason = output.failure_reason();
        if self.first_ran.is_none() && output.status != Some(EXIT_NOT_FOUND) {
            self.first_ran = Some(reason.clone());
        }
        self.last = Some(reason);
    }

    fn into_reason(self) -> String {
        self.first_ran
            .or(self.last)
            .unwrap_or_else(|| "no candidate was tried".to_string())
    }
}

/// Quote an argument for a POSIX shell command line.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::memory::ScriptedRunner;

    fn shell_check(runner: &ScriptedRunner, shell: &'static str) {
        runner.respond_when(
            move |prog, args| {
                prog == "docker" && args.len() == 5 && args[2] == shell && args[4] == "exit 0"
            },
            ExecOutput::ok(""),
        );
    }

    fn exec_lines(runner: &ScriptedRunner) -> Vec<String> {
        runner
            .call_lines()
            .into_iter()
            .filter(|l| !l.ends_with("exit 0"))
            .collect()
    }

    #[test]
    fn stops_at_first_successful_combination() {
        let runner = ScriptedRunner::new();
        shell_check(&runner, "/bin/sh");
        shell_check(&runner, "/bin/bash");
        runner.respond_when(
            |_, args| args.last().map(String::as_str) == Some("/usr/bin/garage status"),
            ExecOutput::ok("ok"),
        );

        let outcome = ShellProbe::new(&runner, "garage").exec(&["status"]).unwrap();

        assert_eq!(outcome.shell.as_deref(), Some("/bin/sh"));
        assert_eq!(outcome.binary, "/usr/bin/garage");
        assert_eq!(
            exec_lines(&runner),
            vec![
                "docker exec garage /bin/sh -c /garage status",
                "docker exec garage /bin/sh -c /usr/local/bin/garage status",
                "docker exec garage /bin/sh -c /usr/bin/garage status",
            ]
        );
    }

    #[test]
    fn moves_on_to_next_shell_when_all_paths_fail() {
        let runner = ScriptedRunner::new();
        shell_check(&runner, "/bin/sh");
        shell_check(&runner, "/bin/ash");
        runner.respond_when(
            |_, args| args.get(2).map(String::as_str) == Some("/bin/ash") && args[4] == "/garage node id -q",
            ExecOutput::ok("abc@127.0.0.1:3901"),
        );

        let probe = ShellProbe::new(&runner, "garage")
            .with_candidates(&["/bin/sh", "/bin/bash", "/bin/ash"], &["/garage", "/bin/garage"]);
        let outcome = probe.exec(&["node", "id", "-q"]).unwrap();

        assert_eq!(outcome.shell.as_deref(), Some("/bin/ash"));
        assert_eq!(
            exec_lines(&runner),
            vec![
                "docker exec garage /bin/sh -c /garage node id -q",
                "docker exec garage /bin/sh -c /bin/garage node id -q",
                "docker exec garage /bin/ash -c /garage node id -q",
            ]
        );
    }

    #[test]
    fn falls_back_to_direct_exec_without_shell() {
        let runner = ScriptedRunner::new();
        runner.respond(
            "docker",
            &["exec", "garage", "/garage"],
            ExecOutput::ok("bucket-a"),
        );

        let outcome = ShellProbe::new(&runner, "garage")
            .exec(&["bucket", "list"])
            .unwrap();

        assert_eq!(outcome.shell, None);
        assert_eq!(outcome.binary, "/garage");
        assert_eq!(outcome.output.stdout, "bucket-a");
        assert_eq!(
            exec_lines(&runner),
            vec!["docker exec garage /garage bucket list"]
        );
    }

    #[test]
    fn no_direct_exec_when_a_shell_exists() {
        let runner = ScriptedRunner::new();
        shell_check(&runner, "/bin/bash");
        runner.respond_when(
            |_, args| args.len() == 5 && args[4] != "exit 0",
            ExecOutput::failed(EXIT_NOT_FOUND, "not found"),
        );

        let err = ShellProbe::new(&runner, "garage")
            .exec(&["status"])
            .unwrap_err();

        match err {
            GaragectlError::ProbeExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, BINARY_CANDIDATES.len());
                assert_eq!(last_error, "not found");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(exec_lines(&runner).iter().all(|l| l.contains(" -c ")));
    }

    #[test]
    fn reports_garage_error_over_later_not_found() {
        let runner = ScriptedRunner::new();
        runner.respond_when(
            |_, args| args.len() == 5 && args[4] != "exit 0",
            ExecOutput::failed(EXIT_NOT_FOUND, "/bin/sh: not found"),
        );
        runner.respond_when(
            |_, args| args.len() == 5 && args[4] == "/garage bucket create photos",
            ExecOutput::failed(1, "Error: Bucket photos already exists"),
        );
        shell_check(&runner, "/bin/sh");

        let err = ShellProbe::new(&runner, "garage")
            .with_candidates(&["/bin/sh"], BINARY_CANDIDATES)
            .exec(&["bucket", "create", "photos"])
            .unwrap_err();

        match err {
            GaragectlError::ProbeExhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, "Error: Bucket photos already exists");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exhaustion_reports_guidance() {
        let runner = ScriptedRunner::new();
        let err = ShellProbe::new(&runner, "garage")
            .exec(&["status"])
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("after 4 attempts"));
        assert!(message.contains("wrong image"));
        assert!(message.contains("known install paths"));
    }

    #[test]
    fn quotes_unsafe_arguments() {
        assert_eq!(shell_quote("bucket-1.data"), "bucket-1.data");
        assert_eq!(shell_quote("my key"), "'my key'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
