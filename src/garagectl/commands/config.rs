use crate::commands::{CmdMessage, CmdResult, Workspace};
use crate::error::Result;
use crate::settings::{Settings, KEYS};

#[derive(Debug, Clone)]
pub enum SettingsAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(workspace: &Workspace, action: SettingsAction) -> Result<CmdResult> {
    let dir = workspace.root();
    match action {
        SettingsAction::ShowAll => {
            let settings = Settings::load(dir)?;
            Ok(CmdResult::default().with_settings(settings))
        }
        SettingsAction::ShowKey(key) => {
            let settings = Settings::load(dir)?;
            let mut result = CmdResult::default();
            match settings.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => result.add_message(CmdMessage::error(unknown_key(&key))),
            }
            Ok(result)
        }
        SettingsAction::Set(key, value) => {
            let mut settings = Settings::load(dir)?;
            if let Err(e) = settings.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            settings.save(dir)?;
            let display_val = settings.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_settings(settings);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

fn unknown_key(key: &str) -> String {
    format!("Unknown setting: {} (known: {})", key, KEYS.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::settings::DeployMode;
    use crate::test_utils::TestEnv;

    #[test]
    fn set_persists_value() {
        let env = TestEnv::new();
        let result = run(
            &env.workspace,
            SettingsAction::Set("mode".into(), "standalone".into()),
        )
        .unwrap();

        assert_eq!(result.messages[0].content, "mode set to standalone");
        let loaded = Settings::load(env.workspace.root()).unwrap();
        assert_eq!(loaded.mode, DeployMode::Standalone);
    }

    #[test]
    fn invalid_value_is_reported_not_saved() {
        let env = TestEnv::new();
        let result = run(
            &env.workspace,
            SettingsAction::Set("port-base".into(), "nope".into()),
        )
        .unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!env.workspace.root().join("garagectl.json").exists());
    }

    #[test]
    fn show_unknown_key() {
        let env = TestEnv::new();
        let result = run(&env.workspace, SettingsAction::ShowKey("colour".into())).unwrap();
        assert!(result.messages[0].content.starts_with("Unknown setting: colour"));
    }

    #[test]
    fn show_all_returns_defaults() {
        let env = TestEnv::new();
        let result = run(&env.workspace, SettingsAction::ShowAll).unwrap();
        assert_eq!(result.settings, Some(Settings::default()));
    }
}
