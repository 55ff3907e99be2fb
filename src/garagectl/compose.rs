//! The compose descriptor used in compose mode.

use crate::error::Result;
use crate::garage_config::{
    CONTAINER_CONFIG_PATH, CONTAINER_DATA_DIR, CONTAINER_META_DIR, CONTAINER_PORTS,
};
use crate::settings::Settings;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Name of the single service in the descriptor.
pub const SERVICE_NAME: &str = "garage";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComposeFile {
    pub services: BTreeMap<String, ComposeService>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComposeService {
    pub image: String,
    pub container_name: String,
    pub restart: String,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
}

impl ComposeFile {
    /// Paths are relative to the directory holding the descriptor.
    pub fn for_settings(settings: &Settings) -> Self {
        let base = settings.port_base();
        let ports = CONTAINER_PORTS
            .iter()
            .enumerate()
            .map(|(offset, port)| format!("{}:{}", base + offset as u16, port))
            .collect();

        let service = ComposeService {
            image: settings.image.clone(),
            container_name: settings.container_name.clone(),
            restart: "unless-stopped".to_string(),
            ports,
            volumes: vec![
                format!("./garage.toml:{}", CONTAINER_CONFIG_PATH),
                format!("./meta:{}", CONTAINER_META_DIR),
                format!("./data:{}", CONTAINER_DATA_DIR),
            ],
        };

        let mut services = BTreeMap::new();
        services.insert(SERVICE_NAME.to_string(), service);
        Self { services }
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()?)?;
        Ok(())
    }
}
