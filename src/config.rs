//! Runtime configuration.
//!
//! Read from the environment (after loading a `.env` file if present) and
//! overridden by command-line flags in `main`.
//!
//! - `HOST`: bind address (default `0.0.0.0`)
//! - `PORT`: listen port (default `3000`)
//! - `SIMULATE_LATENCY`: `true`/`false`, artificial gateway and pricing delays (default `true`)
//! - `PRICING_DELAY_MS`: delay before returning quotes (default `800`)
//! - `RNG_SEED`: seed for the simulated gateway; unset means non-deterministic

use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {message} (got '{value}')")]
    InvalidValue {
        name: &'static str,
        value: String,
        message: String,
    },
    #[error("invalid listen address {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub simulate_latency: bool,
    pub pricing_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            simulate_latency: true,
            pricing_delay_ms: 800,
            rng_seed: None,
        }
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            message: e.to_string(),
        })
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from any name-to-value lookup; empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(flag) = get("SIMULATE_LATENCY") {
            config.simulate_latency = parse("SIMULATE_LATENCY", &flag.to_ascii_lowercase())?;
        }
        if let Some(delay) = get("PRICING_DELAY_MS") {
            config.pricing_delay_ms = parse("PRICING_DELAY_MS", &delay)?;
        }
        if let Some(seed) = get("RNG_SEED") {
            config.rng_seed = Some(parse("RNG_SEED", &seed)?);
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }

    /// Artificial pricing delay, zero when latency simulation is off.
    pub fn pricing_delay(&self) -> std::time::Duration {
        if self.simulate_latency {
            std::time::Duration::from_millis(self.pricing_delay_ms)
        } else {
            std::time::Duration::ZERO
        }
    }
}
