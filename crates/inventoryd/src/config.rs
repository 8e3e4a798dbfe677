//! inventoryd.toml configuration.
//!
//! Every field is optional in the file; missing values fall back to
//! defaults and command-line flags override whatever the file says.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing survives a restart.
    pub in_memory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/inventory"),
            in_memory: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,inventoryd=debug,inventory=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub in_memory: bool,
}

impl InventoryConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: InventoryConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults, then apply
    /// command-line overrides.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.storage.data_dir = data_dir;
        }
        if overrides.in_memory {
            self.storage.in_memory = true;
        }
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port).parse()?;
        Ok(addr)
    }

    /// Path of the redb file inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join("inventory.redb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InventoryConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.storage.in_memory);
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/inventory/inventory.redb"));
    }

    #[test]
    fn parse_partial_file() {
        let toml_str = r#"
[server]
port = 9000

[logging]
format = "json"
"#;
        let config: InventoryConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn load_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventoryd.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9000\n").unwrap();

        let config = InventoryConfig::load(
            Some(&path),
            Overrides {
                port: Some(9100),
                data_dir: Some(PathBuf::from("/tmp/inv")),
                in_memory: true,
            },
        )
        .unwrap();

        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/inv"));
        assert!(config.storage.in_memory);
    }

    #[test]
    fn load_missing_file_fails() {
        let path = Path::new("/nonexistent/inventoryd.toml");
        let result = InventoryConfig::load(Some(path), Overrides::default());
        assert!(result.is_err());
    }
}
