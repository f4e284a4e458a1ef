use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_ENV: &str = "dev";

/// Application configuration for one environment of `config.yaml`.
/// Keys missing from the file fall back to local development defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address: `":3000"`, `"3000"` or `"host:port"`.
    pub port: String,
    pub dsn: String,
    pub database: String,
    #[serde(skip)]
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: ":3000".to_string(),
            dsn: "mongodb://localhost:27017".to_string(),
            database: "agentco".to_string(),
            rust_log: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    environments: HashMap<String, Config>,
}

impl Config {
    /// Reads `CONFIG_PATH` (default `config.yaml`) for the `APP_ENV` environment (default `dev`).
    /// The file must exist.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

        let mut config = Self::load(Path::new(&path), &env)?;
        config.rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        Ok(config)
    }

    pub fn load(path: &Path, env: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&text, env)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    fn parse(text: &str, env: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(text)?;
        Ok(file.environments.get(env).cloned().unwrap_or_default())
    }

    /// Resolves `port` to a socket address; an empty host binds all interfaces.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let port = self.port.trim();
        let addr = match port.strip_prefix(':') {
            Some(bare) => format!("0.0.0.0:{bare}"),
            None if !port.contains(':') => format!("0.0.0.0:{port}"),
            None => port.to_string(),
        };
        addr.parse()
            .with_context(|| format!("port '{}' is not a valid listen address", self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_selected_environment() {
        let file = write_config(
            "environments:\n  dev:\n    port: \":8081\"\n    dsn: mongodb://db:27017\n  prod:\n    port: \":80\"\n",
        );

        let dev = Config::load(file.path(), "dev").unwrap();
        assert_eq!(dev.port, ":8081");
        assert_eq!(dev.dsn, "mongodb://db:27017");
        assert_eq!(dev.database, "agentco");

        let prod = Config::load(file.path(), "prod").unwrap();
        assert_eq!(prod.port, ":80");
        assert_eq!(prod.dsn, "mongodb://localhost:27017");
    }

    #[test]
    fn test_missing_environment_uses_defaults() {
        let file = write_config("environments:\n  dev:\n    port: \":8081\"\n");
        assert_eq!(Config::load(file.path(), "staging").unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.yaml"), "dev").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let file = write_config("environments: [unclosed");
        assert!(Config::load(file.path(), "dev").is_err());
    }

    #[test]
    fn test_listen_addr_forms() {
        let with = |port: &str| Config {
            port: port.to_string(),
            ..Config::default()
        };

        assert_eq!(
            with(":3000").listen_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(with("8080").listen_addr().unwrap().port(), 8080);
        assert_eq!(
            with("127.0.0.1:9000").listen_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert!(with(":http").listen_addr().is_err());
    }
}
