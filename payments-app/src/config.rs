//! Configuration loading from environment.

use std::env;
use std::num::NonZeroU32;

use anyhow::Context;

/// Output format of the fmt tracing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub rate_limit_per_minute: NonZeroU32,
    pub api_keys: Vec<String>,
    pub token_secret: Option<String>,
    pub log_format: LogFormat,
    pub otel_endpoint: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("api_keys", &self.api_keys.len())
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[REDACTED]"))
            .field("log_format", &self.log_format)
            .field("otel_endpoint", &self.otel_endpoint)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse()
            .context("PORT must be a valid port number")?;

        let rate_limit_per_minute = var("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .trim()
            .parse()
            .context("RATE_LIMIT_PER_MINUTE must be a positive integer")?;

        let api_keys = var("API_KEYS")
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let log_format = match var("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("LOG_FORMAT must be `text` or `json`, got `{}`", other),
        };

        Ok(Self {
            host,
            port,
            rate_limit_per_minute,
            api_keys,
            token_secret: var("TOKEN_SECRET"),
            log_format,
            otel_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Socket address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
