use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use sensorhub_core::dashboard::DEFAULT_SEED_DEVICES;
use sensorhub_core::log::DEFAULT_LOG_CAPACITY;

/// Default period between telemetry ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1200;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Period between telemetry ticks in milliseconds (default: `1200`).
    pub tick_interval_ms: u64,
    /// Devices created at startup (default: `3`).
    pub seed_devices: usize,
    /// Maximum retained telemetry log entries (default: `500`).
    pub log_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed_devices: DEFAULT_SEED_DEVICES,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `TICK_INTERVAL_MS`     | `1200`                     |
    /// | `SEED_DEVICES`         | `3`                        |
    /// | `LOG_CAPACITY`         | `500`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let cors_origins: Vec<String> = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::InvalidCorsOrigin(bad.clone()));
        }

        let tick_interval_ms: u64 = parse_var(
            &lookup,
            "TICK_INTERVAL_MS",
            defaults.tick_interval_ms,
            "u64",
        )?;
        if tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "TICK_INTERVAL_MS",
                value: "0".into(),
                expected: "positive u64",
            });
        }

        Ok(Self {
            host,
            port: parse_var(&lookup, "PORT", defaults.port, "u16")?,
            cors_origins,
            request_timeout_secs: parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
                "u64",
            )?,
            tick_interval_ms,
            seed_devices: parse_var(&lookup, "SEED_DEVICES", defaults.seed_devices, "usize")?,
            log_capacity: parse_var(&lookup, "LOG_CAPACITY", defaults.log_capacity, "usize")?,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_var<F, T>(
    lookup: &F,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
            expected,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(config.tick_interval(), Duration::from_millis(1200));
        assert_eq!(config.seed_devices, 3);
        assert_eq!(config.log_capacity, 500);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("TICK_INTERVAL_MS", "250"),
            ("SEED_DEVICES", "0"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, ["http://a.test", "http://b.test"]);
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.seed_devices, 0);
    }

    #[test]
    fn invalid_number_is_rejected() {
        assert_matches!(
            load(&[("PORT", "not-a-port")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        );
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        assert_matches!(
            load(&[("TICK_INTERVAL_MS", "0")]),
            Err(ConfigError::Invalid {
                name: "TICK_INTERVAL_MS",
                ..
            })
        );
    }

    #[test]
    fn invalid_cors_origin_is_rejected() {
        assert_matches!(
            load(&[("CORS_ORIGINS", "http://ok.test,bad\norigin")]),
            Err(ConfigError::InvalidCorsOrigin(_))
        );
    }
}
