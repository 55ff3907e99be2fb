use super::{to_args, CommandRunner, ExecOutput};
use crate::error::{GaragectlError, Result};
use std::path::Path;

pub const DOCKER: &str = "docker";
pub const DOCKER_COMPOSE: &str = "docker-compose";

/// State of the managed container as reported by `docker inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Missing,
    Running,
    /// Any other docker status (`exited`, `created`, `paused`, ...).
    Stopped(String),
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

/// Run a docker subcommand and require it to succeed.
pub fn docker<R: CommandRunner, S: AsRef<str>>(runner: &R, args: &[S]) -> Result<ExecOutput> {
    let args = to_args(args);
    let out = runner.run(DOCKER, &args)?;
    require_success(out, DOCKER, &args)
}

pub fn container_state<R: CommandRunner>(runner: &R, name: &str) -> Result<ContainerState> {
    let out = runner.run(
        DOCKER,
        &to_args(&[
            "inspect",
            "--type",
            "container",
            "-f",
            "{{.State.Status}}",
            name,
        ]),
    )?;
    if !out.success() {
        return Ok(ContainerState::Missing);
    }
    let status = out.stdout.trim();
    Ok(match status {
        "running" => ContainerState::Running,
        other => ContainerState::Stopped(other.to_string()),
    })
}

/// Which flavour of compose is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeTool {
    /// The standalone `docker-compose` binary.
    Standalone,
    /// The `docker compose` CLI plugin.
    Plugin,
}

impl ComposeTool {
    fn command(self) -> (&'static str, Vec<String>) {
        match self {
            ComposeTool::Standalone => (DOCKER_COMPOSE, Vec::new()),
            ComposeTool::Plugin => (DOCKER, vec!["compose".to_string()]),
        }
    }
}

/// Find a usable compose tool, preferring the standalone binary.
pub fn compose_tool<R: CommandRunner>(runner: &R) -> Result<ComposeTool> {
    if runner.locate(DOCKER_COMPOSE).is_some() {
        return Ok(ComposeTool::Standalone);
    }
    let out = runner.run(DOCKER, &to_args(&["compose", "version"]))?;
    if out.success() {
        return Ok(ComposeTool::Plugin);
    }
    Err(GaragectlError::MissingTool(
        "docker-compose (or the docker compose plugin)".to_string(),
    ))
}

/// Run a compose subcommand against `compose_file` and require it to succeed.
pub fn compose<R: CommandRunner, S: AsRef<str>>(
    runner: &R,
    compose_file: &Path,
    args: &[S],
) -> Result<ExecOutput> {
    let tool = compose_tool(runner)?;
    let (program, mut full) = tool.command();
    full.push("-f".to_string());
    full.push(compose_file.display().to_string());
    full.extend(to_args(args));
    let out = runner.run(program, &full)?;
    require_success(out, program, &full)
}

fn require_success(out: ExecOutput, program: &str, args: &[String]) -> Result<ExecOutput> {
    if out.success() {
        return Ok(out);
    }
    let mut verb = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-f" {
            iter.next();
        } else if !arg.starts_with('-') && arg != "compose" {
            verb = Some(arg.as_str());
            break;
        }
    }
    let label = match verb {
        Some(v) => format!("{} {}", program, v),
        None => program.to_string(),
    };
    Err(GaragectlError::Command(format!(
        "{} failed: {}",
        label,
        out.failure_reason()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::memory::ScriptedRunner;
    use std::path::PathBuf;

    #[test]
    fn inspect_failure_means_missing() {
        let runner = ScriptedRunner::new();
        assert_eq!(
            container_state(&runner, "garage").unwrap(),
            ContainerState::Missing
        );
    }

    #[test]
    fn inspect_only_looks_at_containers() {
        let runner = ScriptedRunner::new();
        runner.respond("docker", &["inspect"], ExecOutput::ok("running\n"));
        container_state(&runner, "garage").unwrap();
        assert_eq!(
            runner.call_lines(),
            vec!["docker inspect --type container -f {{.State.Status}} garage"]
        );
    }

    #[test]
    fn inspect_reports_running_and_stopped() {
        let runner = ScriptedRunner::new();
        runner.respond("docker", &["inspect"], ExecOutput::ok("running\n"));
        assert!(container_state(&runner, "garage").unwrap().is_running());

        runner.respond("docker", &["inspect"], ExecOutput::ok("exited\n"));
        assert_eq!(
            container_state(&runner, "garage").unwrap(),
            ContainerState::Stopped("exited".into())
        );
    }

    #[test]
    fn docker_failure_carries_stderr() {
        let runner = ScriptedRunner::new();
        runner.respond("docker", &["stop"], ExecOutput::failed(1, "No such container"));
        let err = docker(&runner, &["stop", "garage"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Command failed: docker stop failed: No such container"
        );
    }

    #[test]
    fn compose_prefers_standalone_binary() {
        let runner = ScriptedRunner::new().with_tool("docker-compose");
        runner.respond("docker-compose", &[], ExecOutput::ok(""));
        compose(&runner, &PathBuf::from("/w/docker-compose.yml"), &["up", "-d"]).unwrap();
        assert_eq!(
            runner.call_lines(),
            vec!["docker-compose -f /w/docker-compose.yml up -d"]
        );
    }

    #[test]
    fn compose_falls_back_to_plugin() {
        let runner = ScriptedRunner::new();
        runner.respond("docker", &["compose"], ExecOutput::ok(""));
        compose(&runner, &PathBuf::from("/w/c.yml"), &["down"]).unwrap();
        assert_eq!(
            runner.call_lines(),
            vec!["docker compose version", "docker compose -f /w/c.yml down"]
        );
    }

    #[test]
    fn no_compose_tool_is_reported() {
        let runner = ScriptedRunner::new();
        assert!(matches!(
            compose_tool(&runner),
            Err(GaragectlError::MissingTool(_))
        ));
    }
}
