//! # API Facade
//!
//! The single entry point for every garagectl operation, whether it comes from the
//! interactive menu or a subcommand.
//!
//! The facade:
//! - **Owns** the process runner, the workspace paths and the loaded settings
//! - **Dispatches** to the matching function in `commands/*.rs`
//! - **Returns** `Result<CmdResult>`; it never prints
//!
//! `GarageApi<R: CommandRunner>` is generic over the runner:
//! - Production: `GarageApi<SystemRunner>`
//! - Testing: `GarageApi<&ScriptedRunner>`, so the test keeps access to the
//!   recorded invocations

use crate::commands::{self, CmdResult, Workspace};
use crate::error::Result;
use crate::runtime::CommandRunner;
use crate::settings::Settings;

pub struct GarageApi<R: CommandRunner> {
    runner: R,
    workspace: Workspace,
    settings: Settings,
}

impl<R: CommandRunner> GarageApi<R> {
    pub fn new(runner: R, workspace: Workspace, settings: Settings) -> Self {
        Self {
            runner,
            workspace,
            settings,
        }
    }

    pub fn preflight(&self) -> Result<CmdResult> {
        commands::preflight::run(&self.runner, &self.settings)
    }

    pub fn setup(&self) -> Result<CmdResult> {
        commands::setup::run(&self.workspace, &self.settings)
    }

    pub fn start(&self) -> Result<CmdResult> {
        commands::lifecycle::start(&self.runner, &self.workspace, &self.settings)
    }

    pub fn stop(&self) -> Result<CmdResult> {
        commands::lifecycle::stop(&self.runner, &self.workspace, &self.settings)
    }

    pub fn restart(&self) -> Result<CmdResult> {
        commands::lifecycle::restart(&self.runner, &self.workspace, &self.settings)
    }

    pub fn remove_container(&self) -> Result<CmdResult> {
        commands::lifecycle::remove(&self.runner, &self.workspace, &self.settings)
    }

    pub fn pull_image(&self) -> Result<CmdResult> {
        commands::lifecycle::pull(&self.runner, &self.settings)
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::status::status(&self.runner, &self.settings)
    }

    pub fn logs(&self) -> Result<CmdResult> {
        commands::status::logs(&self.runner, &self.settings)
    }

    pub fn connection_info(&self) -> Result<CmdResult> {
        commands::status::info(&self.workspace, &self.settings)
    }

    pub fn bootstrap(&self) -> Result<CmdResult> {
        commands::bootstrap::run(&self.runner, &self.settings)
    }

    pub fn create_bucket(&self, name: &str) -> Result<CmdResult> {
        commands::bucket::create(&self.runner, &self.settings, name)
    }

    pub fn list_buckets(&self) -> Result<CmdResult> {
        commands::bucket::list(&self.runner, &self.settings)
    }

    pub fn bucket_info(&self, name: &str) -> Result<CmdResult> {
        commands::bucket::info(&self.runner, &self.settings, name)
    }

    pub fn delete_bucket(&self, name: &str) -> Result<CmdResult> {
        commands::bucket::delete(&self.runner, &self.settings, name)
    }

    pub fn allow(&self, bucket: &str, key: &str, permissions: Permissions) -> Result<CmdResult> {
        commands::bucket::allow(&self.runner, &self.settings, bucket, key, permissions)
    }

    pub fn deny(&self, bucket: &str, key: &str, permissions: Permissions) -> Result<CmdResult> {
        commands::bucket::deny(&self.runner, &self.settings, bucket, key, permissions)
    }

    pub fn create_key(&self, name: &str) -> Result<CmdResult> {
        commands::key::create(&self.runner, &self.settings, name)
    }

    pub fn list_keys(&self) -> Result<CmdResult> {
        commands::key::list(&self.runner, &self.settings)
    }

    pub fn key_info(&self, name: &str) -> Result<CmdResult> {
        commands::key::info(&self.runner, &self.settings, name)
    }

    pub fn delete_key(&self, name: &str) -> Result<CmdResult> {
        commands::key::delete(&self.runner, &self.settings, name)
    }

    pub fn cleanup(&self) -> Result<CmdResult> {
        commands::cleanup::run(&self.runner, &self.workspace, &self.settings)
    }

    /// Show or change persisted settings. A successful `Set` also updates the
    /// settings this instance operates with, except for a mode override given on
    /// the command line.
    pub fn config(&mut self, action: SettingsAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.workspace, action.clone())?;
        if let (SettingsAction::Set(key, _), Some(saved)) = (&action, &result.settings) {
            if key != "mode" {
                let mode = self.settings.mode;
                self.settings = saved.clone();
                self.settings.mode = mode;
            } else {
                self.settings.mode = saved.mode;
            }
        }
        Ok(result)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}

pub use crate::commands::config::SettingsAction;
pub use crate::commands::bucket::Permissions;
pub use commands::{CmdMessage, MessageLevel};
