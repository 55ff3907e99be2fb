use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::compose::ComposeFile;
use crate::error::Result;
use crate::garage_config::GarageConfig;
use crate::settings::{DeployMode, Settings};
use std::fs;

/// Create the deployment directories and generate any missing files.
///
/// Existing files are left untouched.
pub fn run(workspace: &Workspace, settings: &Settings) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for dir in [workspace.meta_dir(), workspace.data_dir()] {
        fs::create_dir_all(&dir)?;
    }
    result.add_message(CmdMessage::info(format!(
        "Using working directory {}",
        workspace.root().display()
    )));

    let config_path = workspace.config_file();
    if config_path.exists() {
        result.add_message(CmdMessage::warning(format!(
            "{} already exists, leaving it untouched",
            config_path.display()
        )));
    } else {
        GarageConfig::generate(&settings.region).write(&config_path)?;
        log::info!("wrote {}", config_path.display());
        result.add_message(CmdMessage::success(format!(
            "Generated {} with fresh secrets",
            config_path.display()
        )));
    }

    if settings.mode == DeployMode::Compose {
        let compose_path = workspace.compose_file();
        if compose_path.exists() {
            result.add_message(CmdMessage::warning(format!(
                "{} already exists, leaving it untouched",
                compose_path.display()
            )));
        } else {
            ComposeFile::for_settings(settings).write(&compose_path)?;
            log::info!("wrote {}", compose_path.display());
            result.add_message(CmdMessage::success(format!(
                "Generated {}",
                compose_path.display()
            )));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn creates_config_compose_and_dirs() {
        let env = TestEnv::new();
        let result = run(&env.workspace, &env.settings).unwrap();

        assert!(env.workspace.config_file().is_file());
        assert!(env.workspace.compose_file().is_file());
        assert!(env.workspace.meta_dir().is_dir());
        assert!(env.workspace.data_dir().is_dir());
        assert!(!result.has_errors());
    }

    #[test]
    fn standalone_mode_skips_compose_file() {
        let env = TestEnv::standalone();
        run(&env.workspace, &env.settings).unwrap();

        assert!(env.workspace.config_file().is_file());
        assert!(!env.workspace.compose_file().exists());
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let env = TestEnv::new();
        run(&env.workspace, &env.settings).unwrap();
        let first = fs::read_to_string(env.workspace.config_file()).unwrap();

        let result = run(&env.workspace, &env.settings).unwrap();
        let second = fs::read_to_string(env.workspace.config_file()).unwrap();

        assert_eq!(first, second);
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("leaving it untouched")));
    }

    #[test]
    fn generated_secrets_differ_between_deployments() {
        let a = TestEnv::new();
        let b = TestEnv::new();
        run(&a.workspace, &a.settings).unwrap();
        run(&b.workspace, &b.settings).unwrap();

        let a = GarageConfig::load(&a.workspace.config_file()).unwrap();
        let b = GarageConfig::load(&b.workspace.config_file()).unwrap();
        assert_ne!(a.rpc_secret, b.rpc_secret);
        assert_ne!(a.admin.admin_token, b.admin.admin_token);
    }
}
