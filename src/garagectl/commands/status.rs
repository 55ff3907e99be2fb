use crate::commands::helpers::garage;
use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::garage_config::GarageConfig;
use crate::runtime::docker::{container_state, docker, ContainerState};
use crate::runtime::CommandRunner;
use crate::settings::Settings;

pub fn status<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    let name = settings.container_name.as_str();
    let mut result = CmdResult::default();

    let filter = format!("name=^/{}$", name);
    let ps = docker(
        runner,
        &[
            "ps",
            "-a",
            "--filter",
            filter.as_str(),
            "--format",
            "table {{.Names}}\t{{.Status}}\t{{.Ports}}",
        ],
    )?;
    result.add_output(ps.stdout);

    match container_state(runner, name)? {
        ContainerState::Missing => {
            result.add_message(CmdMessage::warning(format!(
                "Container '{}' does not exist",
                name
            )));
        }
        ContainerState::Stopped(state) => {
            result.add_message(CmdMessage::warning(format!(
                "Container '{}' is {}",
                name, state
            )));
        }
        ContainerState::Running => match garage(runner, settings, &["status"]) {
            Ok(outcome) => {
                result.add_output(outcome.output.stdout);
                result.add_message(CmdMessage::success(format!("Container '{}' is running", name)));
            }
            Err(e) => {
                result.add_message(CmdMessage::warning(format!(
                    "Container is running but garage did not answer:\n{}",
                    e
                )));
            }
        },
    }

    Ok(result)
}

pub fn logs<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    let tail = settings.log_tail.to_string();
    let out = docker(
        runner,
        &["logs", "--tail", tail.as_str(), settings.container_name.as_str()],
    )?;
    let mut result = CmdResult::default();
    result.add_output(out.combined());
    if result.output.is_empty() {
        result.add_message(CmdMessage::info("No log output"));
    }
    Ok(result)
}

/// Host endpoints and credentials for clients.
pub fn info(workspace: &Workspace, settings: &Settings) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let config_path = workspace.config_file();
    if !config_path.exists() {
        result.add_message(CmdMessage::warning(
            "garage.toml not found, run setup first",
        ));
        return Ok(result);
    }

    let config = GarageConfig::load(&config_path)?;
    let ports = settings.host_ports();
    let lines = [
        format!("S3 endpoint:    http://localhost:{}", ports.s3),
        format!("S3 region:      {}", config.s3_api.s3_region),
        format!("Web endpoint:   http://localhost:{}", ports.web),
        format!("Admin endpoint: http://localhost:{}", ports.admin),
        format!("K2V endpoint:   http://localhost:{}", ports.k2v),
        format!("RPC address:    127.0.0.1:{}", ports.rpc),
        format!("Admin token:    {}", config.admin.admin_token),
        format!("Metrics token:  {}", config.admin.metrics_token),
        format!("Config file:    {}", config_path.display()),
    ];
    result.add_output(lines.join("\n"));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{setup, MessageLevel};
    use crate::runtime::ExecOutput;
    use crate::test_utils::TestEnv;

    #[test]
    fn status_of_running_container_queries_garage() {
        let env = TestEnv::new();
        env.runner
            .respond("docker", &["ps"], ExecOutput::ok("NAMES STATUS\ngarage Up 2 minutes\n"));
        env.container_status("running");
        env.garage_answers("status", "==== HEALTHY NODES ====\n");

        let result = status(&env.runner, &env.settings).unwrap();

        assert_eq!(result.output.len(), 2);
        assert!(result.output[1].contains("HEALTHY NODES"));
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn status_of_missing_container_warns() {
        let env = TestEnv::new();
        env.runner.respond("docker", &["ps"], ExecOutput::ok("NAMES STATUS\n"));

        let result = status(&env.runner, &env.settings).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(!env.runner.call_lines().iter().any(|l| l.contains("exec")));
    }

    #[test]
    fn status_survives_unreachable_garage() {
        let env = TestEnv::new();
        env.runner.respond("docker", &["ps"], ExecOutput::ok(""));
        env.container_status("running");

        let result = status(&env.runner, &env.settings).unwrap();

        assert!(result.messages[0].content.contains("did not answer"));
    }

    #[test]
    fn logs_use_configured_tail() {
        let mut env = TestEnv::new();
        env.settings.log_tail = 20;
        env.runner.respond(
            "docker",
            &["logs"],
            ExecOutput {
                status: Some(0),
                stdout: String::new(),
                stderr: "INFO garage: started\n".into(),
            },
        );

        let result = logs(&env.runner, &env.settings).unwrap();

        assert_eq!(env.runner.call_lines(), vec!["docker logs --tail 20 garage"]);
        assert_eq!(result.output, vec!["INFO garage: started"]);
    }

    #[test]
    fn info_reads_token_back_from_config() {
        let env = TestEnv::new();
        setup::run(&env.workspace, &env.settings).unwrap();
        let config = GarageConfig::load(&env.workspace.config_file()).unwrap();

        let result = info(&env.workspace, &env.settings).unwrap();

        assert!(result.output[0].contains("http://localhost:39300"));
        assert!(result.output[0].contains(&config.admin.admin_token));
    }

    #[test]
    fn info_without_setup_warns() {
        let env = TestEnv::new();
        let result = info(&env.workspace, &env.settings).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }
}
