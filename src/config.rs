// ⚙️ Configuration - environment-driven settings for both binaries

use crate::error::ConfigError;
use crate::loader::DataSource;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime configuration loaded from environment variables.
///
/// | Env Var                  | Default   |
/// |--------------------------|-----------|
/// | `HOST`                   | `0.0.0.0` |
/// | `PORT`                   | `3000`    |
/// | `DATA_REVIEW_SOURCE`     | `builtin` |
/// | `DATA_REVIEW_EXPORT_DIR` | `exports` |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Where the review batch is loaded from.
    pub source: DataSource,
    /// CSV exports and the dashboard log file go here.
    pub export_dir: PathBuf,
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_raw = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let host: IpAddr = host_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "HOST",
            value: host_raw.clone(),
            expected: "an IP address",
        })?;

        let port_raw = lookup("PORT").unwrap_or_else(|| "3000".into());
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "PORT",
            value: port_raw.clone(),
            expected: "a port number",
        })?;

        let source = DataSource::parse(&lookup("DATA_REVIEW_SOURCE").unwrap_or_default());

        let export_dir = PathBuf::from(
            lookup("DATA_REVIEW_EXPORT_DIR").unwrap_or_else(|| "exports".into()),
        );

        Ok(Self {
            host,
            port,
            source,
            export_dir,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.source, DataSource::Builtin);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATA_REVIEW_SOURCE", "http://localhost:3000/api/data"),
            ("DATA_REVIEW_EXPORT_DIR", "/tmp/review"),
        ]))
        .unwrap();

        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.source,
            DataSource::Http("http://localhost:3000/api/data".to_string())
        );
        assert_eq!(config.export_dir, PathBuf::from("/tmp/review"));
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_host() {
        let err = Config::from_lookup(lookup(&[("HOST", "not-an-ip")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HOST", .. }));
    }
}
