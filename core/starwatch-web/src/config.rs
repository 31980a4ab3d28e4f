//! Server configuration.
//!
//! Loaded from `~/.starwatch/config.toml` when present; every field has a
//! default so a missing or malformed file still yields a runnable server.
//! The listen port can additionally come from the `PORT` environment
//! variable or the command line, in ascending order of precedence: file,
//! environment, flag.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::warn;

use starwatch_core::locate::DEFAULT_EXECUTABLE_NAMES;
use starwatch_core::WatchConfig;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Executable names to look for in the process table.
    pub executable_names: Vec<String>,
    /// Overrides deriving the run directory from the executable path.
    pub run_directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            username: "admin".to_string(),
            password: "changeme".to_string(),
            executable_names: DEFAULT_EXECUTABLE_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            run_directory: None,
        }
    }
}

impl ServerConfig {
    /// Discovery settings for the core pipeline.
    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            executable_names: self.executable_names.clone(),
            run_directory: self.run_directory.clone(),
        }
    }

    pub fn effective_port(&self, cli_port: Option<u16>) -> u16 {
        self.resolve_port(cli_port, std::env::var("PORT").ok())
    }

    fn resolve_port(&self, cli_port: Option<u16>, env_port: Option<String>) -> u16 {
        if let Some(port) = cli_port {
            return port;
        }
        if let Some(value) = env_port {
            match value.parse() {
                Ok(port) => return port,
                Err(_) => warn!(value = %value, "ignoring unparseable PORT variable"),
            }
        }
        self.port
    }

    /// Compares fixed-length digests rather than the raw strings. Both
    /// checks always run.
    pub fn credentials_match(&self, username: &str, password: &str) -> bool {
        digest_eq(username, &self.username) & digest_eq(password, &self.password)
    }
}

fn digest_eq(given: &str, expected: &str) -> bool {
    Sha256::digest(given.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Returns the default config file path (`~/.starwatch/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".starwatch").join("config.toml"))
}

/// Loads the configuration, falling back to defaults when the file is
/// missing (the normal case) or malformed (warned about).
pub fn load(explicit: Option<&Path>) -> ServerConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => return ServerConfig::default(),
        },
    };

    let Ok(contents) = fs_err::read_to_string(&path) else {
        return ServerConfig::default();
    };

    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, path = %path.display(), "malformed config file; using defaults");
            ServerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_runnable() {
        let config = ServerConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.executable_names.is_empty());
        assert!(config.run_directory.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(Some(&dir.path().join("nope.toml")));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "port = 9999\n").unwrap();

        let config = load(Some(&path));
        assert_eq!(config.port, 9999);
        assert_eq!(config.username, "admin");
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs_err::write(&path, "port = \"not a number").unwrap();

        let config = load(Some(&path));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_cli_port_beats_env_and_file() {
        let config = ServerConfig {
            port: 1111,
            ..ServerConfig::default()
        };
        assert_eq!(config.resolve_port(Some(3333), Some("2222".to_string())), 3333);
    }

    #[test]
    fn test_env_port_beats_file() {
        let config = ServerConfig {
            port: 1111,
            ..ServerConfig::default()
        };
        assert_eq!(config.resolve_port(None, Some("2222".to_string())), 2222);
    }

    #[test]
    fn test_unparseable_env_port_falls_back_to_file() {
        let config = ServerConfig {
            port: 1111,
            ..ServerConfig::default()
        };
        assert_eq!(config.resolve_port(None, Some("eighty".to_string())), 1111);
    }

    #[test]
    fn test_credentials_match() {
        let config = ServerConfig::default();
        assert!(config.credentials_match("admin", "changeme"));
        assert!(!config.credentials_match("admin", "wrong"));
        assert!(!config.credentials_match("wrong", "changeme"));
        assert!(!config.credentials_match("", ""));
    }
}
