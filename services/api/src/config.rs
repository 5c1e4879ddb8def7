//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Stdout cap for the classifier and ranker subprocesses.
pub const MAX_PROCESS_OUTPUT_BYTES: usize = 512 * 1024;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/api/token";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// How to launch an external script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptCommand {
    pub program: String,
    pub script: PathBuf,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Unset means the process-local store is used.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origin: String,
    pub classifier: ScriptCommand,
    pub classifier_timeout: Duration,
    /// Unset means tracks are ranked in-process.
    pub ranker: Option<ScriptCommand>,
    pub ranker_timeout: Duration,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_api_url: String,
    pub spotify_auth_url: String,
    pub catalog_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // --- Server and Storage Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var("DATABASE_URL");

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- External Scripts ---
        let classifier = ScriptCommand {
            program: var("CLASSIFIER_COMMAND").unwrap_or_else(|| "python3".to_string()),
            script: var("CLASSIFIER_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ml/predict.py")),
        };
        let classifier_timeout = seconds(&var, "CLASSIFIER_TIMEOUT_SECS", 10)?;

        let ranker = var("RANKER_SCRIPT").map(|script| ScriptCommand {
            program: var("RANKER_COMMAND").unwrap_or_else(|| "python3".to_string()),
            script: PathBuf::from(script),
        });
        let ranker_timeout = seconds(&var, "RANKER_TIMEOUT_SECS", 10)?;

        // --- Music Catalog ---
        let spotify_client_id = var("SPOTIFY_CLIENT_ID");
        let spotify_client_secret = var("SPOTIFY_CLIENT_SECRET");
        let spotify_api_url =
            var("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string());
        let spotify_auth_url =
            var("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.to_string());
        let catalog_timeout = seconds(&var, "CATALOG_TIMEOUT_SECS", 10)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            classifier,
            classifier_timeout,
            ranker,
            ranker_timeout,
            spotify_client_id,
            spotify_client_secret,
            spotify_api_url,
            spotify_auth_url,
            catalog_timeout,
        })
    }
}

fn seconds(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match var(key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidValue(
                key.to_string(),
                format!("'{}' is not a positive number of seconds", raw),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 5000);
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.classifier.program, "python3");
        assert_eq!(config.classifier.script, PathBuf::from("ml/predict.py"));
        assert_eq!(config.classifier_timeout, Duration::from_secs(10));
        assert!(config.ranker.is_none());
        assert!(config.spotify_client_id.is_none());
        assert_eq!(config.spotify_api_url, DEFAULT_SPOTIFY_API_URL);
    }

    #[test]
    fn ranker_script_enables_the_subprocess_ranker() {
        let config = config_from(&[
            ("RANKER_SCRIPT", "ml/song_recommender.py"),
            ("RANKER_COMMAND", "/usr/bin/python3"),
            ("RANKER_TIMEOUT_SECS", "4"),
        ])
        .unwrap();
        let ranker = config.ranker.unwrap();
        assert_eq!(ranker.program, "/usr/bin/python3");
        assert_eq!(ranker.script, PathBuf::from("ml/song_recommender.py"));
        assert_eq!(config.ranker_timeout, Duration::from_secs(4));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn invalid_values_are_reported_with_their_variable() {
        let err = config_from(&[("BIND_ADDRESS", "not-an-address")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "BIND_ADDRESS"));

        let err = config_from(&[("CLASSIFIER_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue(ref key, _) if key == "CLASSIFIER_TIMEOUT_SECS")
        );

        let err = config_from(&[("RUST_LOG", "chatty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "RUST_LOG"));
    }
}
