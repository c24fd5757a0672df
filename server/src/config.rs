//! Server configuration parsed from environment variables.

use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_FUNCTION_BASE_PATH: &str = "/.netlify/functions/api";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Prefix under which the stateless function adapter is mounted. Always
    /// starts with `/` and never ends with one.
    pub function_base_path: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            function_base_path: DEFAULT_FUNCTION_BASE_PATH.to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `FUNCTION_BASE_PATH`: default `/.netlify/functions/api`
    /// - `MAX_BODY_BYTES`: default 2 MiB
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let port = match lookup("PORT") {
            Some(raw) => parse_value("PORT", &raw)?,
            None => DEFAULT_PORT,
        };
        let function_base_path = normalize_base_path(
            lookup("FUNCTION_BASE_PATH")
                .as_deref()
                .unwrap_or(DEFAULT_FUNCTION_BASE_PATH),
        )?;
        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => parse_value("MAX_BODY_BYTES", &raw)?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self { bind_addr, port, function_base_path, max_body_bytes })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = lookup(var).unwrap_or_else(|| default.to_owned());
    parse_value(var, &raw)
}

fn parse_value<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { var, value: raw.to_owned() })
}

fn normalize_base_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    let shadows_api = trimmed == "api" || trimmed.starts_with("api/");
    if trimmed.is_empty() || shadows_api || trimmed.contains(['{', '}', '*']) {
        return Err(ConfigError::Invalid { var: "FUNCTION_BASE_PATH", value: raw.to_owned() });
    }
    Ok(format!("/{trimmed}"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
