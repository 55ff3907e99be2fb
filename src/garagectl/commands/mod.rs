use crate::error::Result;
use crate::settings::Settings;
use std::path::{Path, PathBuf};

pub mod bootstrap;
pub mod bucket;
pub mod cleanup;
pub mod config;
pub mod helpers;
pub mod key;
pub mod lifecycle;
pub mod preflight;
pub mod setup;
pub mod status;

const CONFIG_FILENAME: &str = "garage.toml";
const COMPOSE_FILENAME: &str = "docker-compose.yml";

/// Files and directories owned by one garage deployment.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Like [`Workspace::new`], but anchors a relative root at the current
    /// directory. Docker treats a relative `-v` source as a volume name.
    pub fn resolve(root: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(std::path::absolute(root)?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join(COMPOSE_FILENAME)
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Verbatim output of the delegated commands, one block per command.
    pub output: Vec<String>,
    pub node_id: Option<String>,
    pub settings: Option<Settings>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// Record command output, skipping empty blocks.
    pub fn add_output(&mut self, block: impl Into<String>) {
        let block = block.into();
        let trimmed = block.trim_end();
        if !trimmed.is_empty() {
            self.output.push(trimmed.to_string());
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
