//! The `garage.toml` handed to the server through a bind mount.
//!
//! Paths and ports here are the ones *inside* the container; host port mapping is
//! the business of [`crate::compose`] and the lifecycle commands.

use crate::error::Result;
use crate::secrets;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONTAINER_CONFIG_PATH: &str = "/etc/garage.toml";
pub const CONTAINER_META_DIR: &str = "/var/lib/garage/meta";
pub const CONTAINER_DATA_DIR: &str = "/var/lib/garage/data";

pub const S3_PORT: u16 = 3900;
pub const RPC_PORT: u16 = 3901;
pub const WEB_PORT: u16 = 3902;
pub const ADMIN_PORT: u16 = 3903;
pub const K2V_PORT: u16 = 3904;

/// Container ports in publishing order (matches [`crate::settings::HostPorts`]).
pub const CONTAINER_PORTS: [u16; 5] = [S3_PORT, RPC_PORT, WEB_PORT, ADMIN_PORT, K2V_PORT];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GarageConfig {
    pub metadata_dir: String,
    pub data_dir: String,
    pub db_engine: String,
    pub replication_factor: u32,
    pub rpc_bind_addr: String,
    pub rpc_public_addr: String,
    pub rpc_secret: String,
    pub s3_api: S3Api,
    pub s3_web: S3Web,
    pub k2v_api: K2vApi,
    pub admin: Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Api {
    pub s3_region: String,
    pub api_bind_addr: String,
    pub root_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Web {
    pub bind_addr: String,
    pub root_domain: String,
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct K2vApi {
    pub api_bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub api_bind_addr: String,
    pub admin_token: String,
    pub metrics_token: String,
}

fn bind_all(port: u16) -> String {
    format!("[::]:{}", port)
}

impl GarageConfig {
    /// Single-node config with fresh secrets.
    pub fn generate(region: &str) -> Self {
        Self {
            metadata_dir: CONTAINER_META_DIR.to_string(),
            data_dir: CONTAINER_DATA_DIR.to_string(),
            db_engine: "sqlite".to_string(),
            replication_factor: 1,
            rpc_bind_addr: bind_all(RPC_PORT),
            rpc_public_addr: format!("127.0.0.1:{}", RPC_PORT),
            rpc_secret: secrets::rpc_secret(),
            s3_api: S3Api {
                s3_region: region.to_string(),
                api_bind_addr: bind_all(S3_PORT),
                root_domain: ".s3.garage.localhost".to_string(),
            },
            s3_web: S3Web {
                bind_addr: bind_all(WEB_PORT),
                root_domain: ".web.garage.localhost".to_string(),
                index: "index.html".to_string(),
            },
            k2v_api: K2vApi {
                api_bind_addr: bind_all(K2V_PORT),
            },
            admin: Admin {
                api_bind_addr: bind_all(ADMIN_PORT),
                admin_token: secrets::api_token(),
                metrics_token: secrets::api_token(),
            },
        }
    }

    pub fn render(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_config_has_expected_layout() {
        let config = GarageConfig::generate("garage");
        let rendered = config.render().unwrap();

        assert!(rendered.contains("metadata_dir = \"/var/lib/garage/meta\""));
        assert!(rendered.contains("replication_factor = 1"));
        assert!(rendered.contains("rpc_bind_addr = \"[::]:3901\""));
        assert!(rendered.contains("[s3_api]"));
        assert!(rendered.contains("s3_region = \"garage\""));
        assert!(rendered.contains("[s3_web]"));
        assert!(rendered.contains("[k2v_api]"));
        assert!(rendered.contains("[admin]"));
    }

    #[test]
    fn secrets_are_fresh_per_config() {
        let a = GarageConfig::generate("garage");
        let b = GarageConfig::generate("garage");
        assert_ne!(a.rpc_secret, b.rpc_secret);
        assert_ne!(a.admin.admin_token, b.admin.admin_token);
        assert_ne!(a.admin.admin_token, a.admin.metrics_token);
        assert_eq!(a.rpc_secret.len(), 64);
        assert_eq!(a.admin.metrics_token.len(), 44);
    }

    #[test]
    fn written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garage.toml");
        let config = GarageConfig::generate("eu-west");
        config.write(&path).unwrap();

        assert_eq!(GarageConfig::load(&path).unwrap(), config);
    }
}
