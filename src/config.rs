use std::env;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Path of the container list on the upstream, relative to its origin.
pub const CONTAINERS_PATH: &str = "/api/containers";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid UPSTREAM_URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("invalid {var} {value:?}: expected a positive number of milliseconds")]
    InvalidMillis { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub containers_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        let upstream = lookup("UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.into());
        let containers_url = Url::parse(&upstream)
            .and_then(|base| base.join(CONTAINERS_PATH))
            .map_err(|e| ConfigError::InvalidUrl {
                value: upstream.clone(),
                reason: e.to_string(),
            })?;
        if !matches!(containers_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                value: upstream,
                reason: "scheme must be http or https".into(),
            });
        }

        let poll_interval = match lookup("POLL_INTERVAL_MS") {
            Some(v) => parse_millis("POLL_INTERVAL_MS", v)?,
            None => DEFAULT_POLL_INTERVAL,
        };
        let request_timeout = lookup("REQUEST_TIMEOUT_MS")
            .map(|v| parse_millis("REQUEST_TIMEOUT_MS", v))
            .transpose()?;

        Ok(Self {
            bind_addr,
            containers_url,
            poll_interval,
            request_timeout,
        })
    }
}

fn parse_millis(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidMillis { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            cfg.containers_url.as_str(),
            "http://127.0.0.1:8000/api/containers"
        );
        assert_eq!(cfg.poll_interval, Duration::from_millis(5000));
        assert_eq!(cfg.request_timeout, None);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("UPSTREAM_URL", "https://monitor.internal/"),
            ("POLL_INTERVAL_MS", "250"),
            ("REQUEST_TIMEOUT_MS", "1000"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(
            cfg.containers_url.as_str(),
            "https://monitor.internal/api/containers"
        );
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn rejects_zero_and_garbage_intervals() {
        assert!(matches!(
            load(&[("POLL_INTERVAL_MS", "0")]),
            Err(ConfigError::InvalidMillis { var: "POLL_INTERVAL_MS", .. })
        ));
        assert!(matches!(
            load(&[("REQUEST_TIMEOUT_MS", "soon")]),
            Err(ConfigError::InvalidMillis { var: "REQUEST_TIMEOUT_MS", .. })
        ));
    }

    #[test]
    fn rejects_bad_upstream() {
        assert!(matches!(
            load(&[("UPSTREAM_URL", "not a url")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            load(&[("UPSTREAM_URL", "ftp://example.com")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
