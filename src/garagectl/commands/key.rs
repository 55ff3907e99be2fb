use crate::commands::helpers::{ensure_running, garage, require_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::runtime::CommandRunner;
use crate::settings::Settings;

pub fn create<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = require_name("Key", name)?;
    ensure_running(runner, settings)?;
    let outcome = garage(runner, settings, &["key", "create", name.as_str()])?;

    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    result.add_message(CmdMessage::success(format!("Key '{}' created", name)));
    result.add_message(CmdMessage::warning(
        "Store the secret key now; it is only shown again with 'key info --show-secret'",
    ));
    Ok(result)
}

pub fn list<R: CommandRunner>(runner: &R, settings: &Settings) -> Result<CmdResult> {
    ensure_running(runner, settings)?;
    let outcome = garage(runner, settings, &["key", "list"])?;
    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    Ok(result)
}

pub fn info<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = require_name("Key", name)?;
    ensure_running(runner, settings)?;
    let outcome = garage(
        runner,
        settings,
        &["key", "info", "--show-secret", name.as_str()],
    )?;
    let mut result = CmdResult::default();
    result.add_output(outcome.output.stdout);
    Ok(result)
}

pub fn delete<R: CommandRunner>(runner: &R, settings: &Settings, name: &str) -> Result<CmdResult> {
    let name = require_name("Key", name)?;
    ensure_running(runner, settings)?;
    garage(runner, settings, &["key", "delete", "--yes", name.as_str()])?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Key '{}' deleted", name)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GaragectlError;
    use crate::test_utils::TestEnv;

    #[test]
    fn create_prints_credentials() {
        let env = TestEnv::new();
        env.container_status("running");
        env.garage_answers(
            "key create app-key",
            "Key name: app-key\nKey ID: GK31c2f218a2e44f485b94239e\nSecret key: b892c0665f0ada8a4755dae98baa3b133590e11dae3bcc1f9d769d67f16c3835\n",
        );

        let result = create(&env.runner, &env.settings, "app-key").unwrap();

        assert!(result.output[0].contains("Key ID: GK31c2f218a2e44f485b94239e"));
    }

    #[test]
    fn names_with_spaces_are_quoted() {
        let env = TestEnv::new();
        env.container_status("running");
        env.garage_answers("key info --show-secret 'backup key'", "Key name: backup key");

        let result = info(&env.runner, &env.settings, "backup key").unwrap();

        assert_eq!(result.output, vec!["Key name: backup key"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let env = TestEnv::new();
        assert!(matches!(
            delete(&env.runner, &env.settings, "  "),
            Err(GaragectlError::Input(_))
        ));
    }
}
