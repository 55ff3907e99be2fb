use crate::commands::{CmdMessage, CmdResult};
use crate::error::{GaragectlError, Result};
use crate::runtime::docker::{compose_tool, ComposeTool, DOCKER};
use crate::runtime::CommandRunner;
use crate::settings::{DeployMode, Settings};

/// Verify the external tools the current mode needs are installed.
///
/// A missing tool is the one fatal error of the program.
pub fn run<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    let docker = runner
        .locate(DOCKER)
        .ok_or_else(|| GaragectlError::MissingTool(DOCKER.to_string()))?;
    log::debug!("docker found at {}", docker.display());

    let mut result = CmdResult::default();
    if settings.mode == DeployMode::Compose {
        let tool = compose_tool(runner)?;
        let name = match tool {
            ComposeTool::Standalone => "docker-compose",
            ComposeTool::Plugin => "docker compose",
        };
        log::debug!("using {}", name);
        result.add_message(CmdMessage::info(format!("Using {}", name)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::memory::ScriptedRunner;
    use crate::runtime::ExecOutput;

    #[test]
    fn missing_docker_is_fatal() {
        let runner = ScriptedRunner::new();
        let err = run(&runner, &Settings::default()).unwrap_err();
        assert_eq!(err.to_string(), "Required tool not found: docker");
    }

    #[test]
    fn standalone_mode_needs_only_docker() {
        let runner = ScriptedRunner::new().with_tool("docker");
        let settings = Settings {
            mode: DeployMode::Standalone,
            ..Settings::default()
        };
        assert!(run(&runner, &settings).is_ok());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn compose_mode_needs_compose() {
        let runner = ScriptedRunner::new().with_tool("docker");
        assert!(matches!(
            run(&runner, &Settings::default()),
            Err(GaragectlError::MissingTool(_))
        ));

        runner.respond("docker", &["compose", "version"], ExecOutput::ok("v2.29.1"));
        let result = run(&runner, &Settings::default()).unwrap();
        assert_eq!(result.messages[0].content, "Using docker compose");
    }
}
