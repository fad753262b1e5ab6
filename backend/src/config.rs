//! Server configuration, read from `CSV_REVIEW_*` environment variables.

use std::path::PathBuf;
use thiserror::Error;

pub const ENV_HOST: &str = "CSV_REVIEW_HOST";
pub const ENV_PORT: &str = "CSV_REVIEW_PORT";
pub const ENV_DB: &str = "CSV_REVIEW_DB";
pub const ENV_NAMESPACE: &str = "CSV_REVIEW_NAMESPACE";
pub const ENV_BODY_LIMIT: &str = "CSV_REVIEW_BODY_LIMIT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding the key-value substrate.
    pub database_path: PathBuf,
    /// Key prefix of the job store inside the database.
    pub namespace: String,
    /// Maximum request body size in bytes, for uploads and backup imports.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("csv_review.sqlite"),
            namespace: "csv_review".to_string(),
            body_limit: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, falling back to the defaults
    /// for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = non_empty(ENV_HOST, host)?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_number(ENV_PORT, port)?;
        }
        if let Some(path) = lookup(ENV_DB) {
            config.database_path = PathBuf::from(non_empty(ENV_DB, path)?);
        }
        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            config.namespace = non_empty(ENV_NAMESPACE, namespace.trim_matches('/').to_string())?;
        }
        if let Some(limit) = lookup(ENV_BODY_LIMIT) {
            config.body_limit = parse_number(ENV_BODY_LIMIT, limit)?;
        }

        Ok(config)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::Empty(key));
    }
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_PORT, "9000"),
            (ENV_DB, "/tmp/review.sqlite"),
            (ENV_NAMESPACE, "/team_a/"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/review.sqlite"));
        assert_eq!(config.namespace, "team_a");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_PORT, "eighty")])),
            Err(ConfigError::InvalidNumber {
                key: ENV_PORT,
                value: "eighty".to_string()
            })
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_NAMESPACE, "//")])),
            Err(ConfigError::Empty(ENV_NAMESPACE))
        );
    }
}
