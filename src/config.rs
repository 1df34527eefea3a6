// src/config.rs

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_USER_AGENT: &str = "SentinelRS/0.1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Timeouts and identity used by the live probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Whole-request timeout for every HTTP probe.
    pub http_timeout: Duration,
    /// Connect and handshake timeout for the certificate check.
    pub tls_timeout: Duration,
    /// Per-query DNS timeout.
    pub dns_timeout: Duration,
    /// TCP connect timeout for the port scan.
    pub port_timeout: Duration,
    /// Upper bound for a single probe, fan-out included.
    pub probe_deadline: Duration,
    pub user_agent: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(10),
            tls_timeout: Duration::from_secs(10),
            dns_timeout: Duration::from_secs(5),
            port_timeout: Duration::from_millis(2000),
            probe_deadline: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub scan: ScanSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            scan: ScanSettings::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to defaults
    /// for keys that are absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        let host = match lookup("SENTINEL_BIND_HOST") {
            Some(value) => parse_value("SENTINEL_BIND_HOST", &value)?,
            None => config.bind_addr.ip(),
        };
        let port = match lookup("PORT") {
            Some(value) => parse_value("PORT", &value)?,
            None => config.bind_addr.port(),
        };
        config.bind_addr = SocketAddr::new(host, port);

        if let Some(value) = lookup("SENTINEL_HTTP_TIMEOUT_SECS") {
            config.scan.http_timeout = parse_timeout("SENTINEL_HTTP_TIMEOUT_SECS", &value, Duration::from_secs)?;
        }
        if let Some(value) = lookup("SENTINEL_TLS_TIMEOUT_SECS") {
            config.scan.tls_timeout = parse_timeout("SENTINEL_TLS_TIMEOUT_SECS", &value, Duration::from_secs)?;
        }
        if let Some(value) = lookup("SENTINEL_DNS_TIMEOUT_SECS") {
            config.scan.dns_timeout = parse_timeout("SENTINEL_DNS_TIMEOUT_SECS", &value, Duration::from_secs)?;
        }
        if let Some(value) = lookup("SENTINEL_PORT_TIMEOUT_MS") {
            config.scan.port_timeout = parse_timeout("SENTINEL_PORT_TIMEOUT_MS", &value, Duration::from_millis)?;
        }
        if let Some(value) = lookup("SENTINEL_PROBE_DEADLINE_SECS") {
            config.scan.probe_deadline = parse_timeout("SENTINEL_PROBE_DEADLINE_SECS", &value, Duration::from_secs)?;
        }
        if let Some(value) = lookup("SENTINEL_USER_AGENT") {
            if !value.trim().is_empty() {
                config.scan.user_agent = value;
            }
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value: value.to_string() })
}

/// Timeouts must be positive; a zero timeout fails every connection.
fn parse_timeout(key: &'static str, value: &str, unit: fn(u64) -> Duration) -> Result<Duration, ConfigError> {
    match parse_value::<u64>(key, value)? {
        0 => Err(ConfigError::InvalidValue { key, value: value.to_string() }),
        amount => Ok(unit(amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.scan.port_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("SENTINEL_BIND_HOST", "127.0.0.1"),
            ("SENTINEL_HTTP_TIMEOUT_SECS", "3"),
            ("SENTINEL_PORT_TIMEOUT_MS", "500"),
            ("SENTINEL_USER_AGENT", "Probe/2"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.scan.http_timeout, Duration::from_secs(3));
        assert_eq!(config.scan.port_timeout, Duration::from_millis(500));
        assert_eq!(config.scan.user_agent, "Probe/2");
    }

    #[test]
    fn test_invalid_value_names_the_key() {
        let err = Config::from_lookup(lookup_from(&[("SENTINEL_DNS_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidValue { key: "SENTINEL_DNS_TIMEOUT_SECS", value: "soon".to_string() });
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        for key in [
            "SENTINEL_HTTP_TIMEOUT_SECS",
            "SENTINEL_TLS_TIMEOUT_SECS",
            "SENTINEL_DNS_TIMEOUT_SECS",
            "SENTINEL_PORT_TIMEOUT_MS",
            "SENTINEL_PROBE_DEADLINE_SECS",
        ] {
            let err = Config::from_lookup(lookup_from(&[(key, "0")])).unwrap_err();
            assert_eq!(err, ConfigError::InvalidValue { key, value: "0".to_string() });
        }
    }

    #[test]
    fn test_huge_timeout_is_accepted() {
        let config = Config::from_lookup(lookup_from(&[("SENTINEL_TLS_TIMEOUT_SECS", "18446744073709551615")])).unwrap();
        assert_eq!(config.scan.tls_timeout, Duration::from_secs(u64::MAX));
    }
}
