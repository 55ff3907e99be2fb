use crate::error::{GaragectlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const SETTINGS_FILENAME: &str = "garagectl.json";

pub const DEFAULT_IMAGE: &str = "dxflrs/garage:v1.0.1";
pub const DEFAULT_CONTAINER: &str = "garage";
pub const COMPOSE_PORT_BASE: u16 = 39300;
pub const STANDALONE_PORT_BASE: u16 = 3900;

/// Number of host ports the container publishes (S3, RPC, web, admin, K2V).
pub const PORT_COUNT: u16 = 5;

/// Setting keys accepted by [`Settings::get`] and [`Settings::set`].
pub const KEYS: &[&str] = &[
    "mode",
    "container",
    "image",
    "port-base",
    "zone",
    "capacity",
    "region",
    "startup-delay",
    "retry-delay",
    "log-tail",
];

/// How the container is driven.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Through a generated compose file.
    #[default]
    Compose,
    /// As a single container managed with plain `docker` commands.
    Standalone,
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Compose => write!(f, "compose"),
            DeployMode::Standalone => write!(f, "standalone"),
        }
    }
}

impl FromStr for DeployMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compose" => Ok(DeployMode::Compose),
            "standalone" | "docker" => Ok(DeployMode::Standalone),
            other => Err(format!(
                "Unknown mode '{}' (expected compose or standalone)",
                other
            )),
        }
    }
}

/// Host ports published for each Garage endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPorts {
    pub s3: u16,
    pub rpc: u16,
    pub web: u16,
    pub admin: u16,
    pub k2v: u16,
}

/// Tool settings, stored in `<workdir>/garagectl.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub mode: DeployMode,

    #[serde(default = "default_container")]
    pub container_name: String,

    #[serde(default = "default_image")]
    pub image: String,

    /// First host port; `None` picks the default for the mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_base: Option<u16>,

    #[serde(default = "default_zone")]
    pub zone: String,

    /// Capacity weight passed to `layout assign -c`.
    #[serde(default = "default_capacity")]
    pub capacity: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Seconds to wait after starting the container before talking to garage.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,

    /// Seconds to wait before the single node-id retry.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    #[serde(default = "default_log_tail")]
    pub log_tail: usize,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_zone() -> String {
    "dc1".to_string()
}

fn default_capacity() -> String {
    "1G".to_string()
}

fn default_region() -> String {
    "garage".to_string()
}

fn default_startup_delay() -> u64 {
    10
}

fn default_retry_delay() -> u64 {
    5
}

fn default_log_tail() -> usize {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: DeployMode::default(),
            container_name: default_container(),
            image: default_image(),
            port_base: None,
            zone: default_zone(),
            capacity: default_capacity(),
            region: default_region(),
            startup_delay_secs: default_startup_delay(),
            retry_delay_secs: default_retry_delay(),
            log_tail: default_log_tail(),
        }
    }
}

impl Settings {
    /// Load settings from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(SETTINGS_FILENAME);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        if let Some(port) = settings.port_base {
            check_port_base(port).map_err(|e| {
                GaragectlError::Input(format!("{} in {}", e, path.display()))
            })?;
        }
        Ok(settings)
    }

    /// Save settings to the given directory
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SETTINGS_FILENAME), content)?;
        Ok(())
    }

    pub fn port_base(&self) -> u16 {
        self.port_base.unwrap_or(match self.mode {
            DeployMode::Compose => COMPOSE_PORT_BASE,
            DeployMode::Standalone => STANDALONE_PORT_BASE,
        })
    }

    pub fn host_ports(&self) -> HostPorts {
        let base = self.port_base();
        HostPorts {
            s3: base,
            rpc: base + 1,
            web: base + 2,
            admin: base + 3,
            k2v: base + 4,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "mode" => self.mode.to_string(),
            "container" => self.container_name.clone(),
            "image" => self.image.clone(),
            "port-base" => self.port_base().to_string(),
            "zone" => self.zone.clone(),
            "capacity" => self.capacity.clone(),
            "region" => self.region.clone(),
            "startup-delay" => self.startup_delay_secs.to_string(),
            "retry-delay" => self.retry_delay_secs.to_string(),
            "log-tail" => self.log_tail.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "mode" => self.mode = value.parse()?,
            "container" => self.container_name = non_empty(key, value)?,
            "image" => self.image = non_empty(key, value)?,
            "port-base" => {
                let port: u16 = parse_number(key, value)?;
                check_port_base(port)?;
                self.port_base = Some(port);
            }
            "zone" => self.zone = non_empty(key, value)?,
            "capacity" => self.capacity = non_empty(key, value)?,
            "region" => self.region = non_empty(key, value)?,
            "startup-delay" => self.startup_delay_secs = parse_number(key, value)?,
            "retry-delay" => self.retry_delay_secs = parse_number(key, value)?,
            "log-tail" => self.log_tail = parse_number(key, value)?,
            _ => return Err(format!("Unknown setting: {}", key)),
        }
        Ok(())
    }
}

/// The base port plus the other published ports must all fit in a `u16`.
fn check_port_base(port: u16) -> std::result::Result<(), String> {
    let max = u16::MAX - (PORT_COUNT - 1);
    if port == 0 || port > max {
        return Err(format!("port-base must be between 1 and {}", max));
    }
    Ok(())
}

fn non_empty(key: &str, value: &str) -> std::result::Result<String, String> {
    if value.is_empty() {
        Err(format!("{} cannot be empty", key))
    } else {
        Ok(value.to_string())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> std::result::Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", key, value))
}
