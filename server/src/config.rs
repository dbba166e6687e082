use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Listener and CORS settings, loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on how long in-flight requests may drain after shutdown.
    pub shutdown_timeout: Duration,
    pub cors_origins: Vec<String>,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 1000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shutdown_timeout: Duration::from_millis(DEFAULT_SHUTDOWN_TIMEOUT_MS),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
            None => defaults.port,
        };
        let shutdown_timeout = match lookup("SHUTDOWN_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .context("SHUTDOWN_TIMEOUT_MS must be a whole number of milliseconds")?,
            ),
            None => defaults.shutdown_timeout,
        };
        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_origins,
        };
        if cors_origins.iter().any(|origin| origin == "*") {
            bail!("CORS_ORIGINS cannot contain `*` while credentials are allowed; list origins explicitly");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            shutdown_timeout,
            cors_origins,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
