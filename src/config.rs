//! Server configuration
//!
//! Resolved in layers, later ones winning: built-in defaults, an optional
//! TOML file, environment variables, then command-line flags (applied by the
//! binary).
//!
//! ```toml
//! bind_address = "0.0.0.0"
//! port = 8080
//! data_dir = "/var/lib/studydeck/study_sets"
//! permissive_cors = false
//! ```

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::study_sets::StudySetStorage;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    /// Directory holding the study set files
    pub data_dir: PathBuf,
    /// Allow cross-origin requests from any origin
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            data_dir: default_sets_dir(),
            permissive_cors: true,
        }
    }
}

/// `<local data dir>/studydeck/study_sets`, or `./study_sets` when the
/// platform has no data directory
pub fn default_sets_dir() -> PathBuf {
    StudySetStorage::default_data_dir()
        .map(|p| p.join("study_sets"))
        .unwrap_or_else(|_| PathBuf::from("study_sets"))
}

impl ServerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults (or the given file) with environment overrides applied
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                log::info!("Loaded config from {:?}", path);
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PORT`, `STUDYDECK_PORT`, `STUDYDECK_BIND`, `STUDYDECK_DATA_DIR`
    /// and `STUDYDECK_CORS`. `STUDYDECK_PORT` beats `PORT`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["PORT", "STUDYDECK_PORT"] {
            if let Some(value) = lookup(key) {
                self.port = parse_env(key, &value)?;
            }
        }
        if let Some(value) = lookup("STUDYDECK_BIND") {
            self.bind_address = parse_env("STUDYDECK_BIND", &value)?;
        }
        if let Some(value) = lookup("STUDYDECK_DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("STUDYDECK_CORS") {
            self.permissive_cors = parse_env("STUDYDECK_CORS", &value)?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.data_dir.ends_with("study_sets"));
        assert!(config.permissive_cors);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str("port = 8080\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_full_toml() {
        let config = ServerConfig::from_toml_str(
            r#"
            bind_address = "0.0.0.0"
            port = 9000
            data_dir = "/tmp/sets"
            permissive_cors = false
            "#,
        )
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/sets"));
        assert!(!config.permissive_cors);
    }

    #[test]
    fn test_bad_toml_errors() {
        assert!(matches!(
            ServerConfig::from_toml_str("port = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[
                ("PORT", "4000"),
                ("STUDYDECK_BIND", "0.0.0.0"),
                ("STUDYDECK_DATA_DIR", "/srv/sets"),
                ("STUDYDECK_CORS", "false"),
            ]))
            .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:4000");
        assert_eq!(config.data_dir, PathBuf::from("/srv/sets"));
        assert!(!config.permissive_cors);
    }

    #[test]
    fn test_studydeck_port_beats_port() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[("PORT", "4000"), ("STUDYDECK_PORT", "5000")]))
            .unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_env_from(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key, .. } if key == "PORT"));
    }
}
