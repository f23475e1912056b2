//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub api_timeout: Duration,
    pub rate_limit_per_minute: u32,
    /// Whether a proxy in front of the service sets `X-Forwarded-For`.
    pub trust_forwarded_for: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let api_base_url = lookup("FREE_CURRENCY_API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("FREE_CURRENCY_API_BASE_URL environment variable is required")
            })?;

        let api_key = lookup("FREE_CURRENCY_API_API_KEY").filter(|key| !key.trim().is_empty());

        let api_timeout = match lookup("FREE_CURRENCY_API_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(positive(&secs, "FREE_CURRENCY_API_TIMEOUT_SECS")?),
            None => rates_client::DEFAULT_TIMEOUT,
        };

        let rate_limit_per_minute: u32 = match lookup("RATE_LIMIT_PER_MINUTE") {
            Some(limit) => positive(&limit, "RATE_LIMIT_PER_MINUTE")?
                .try_into()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE is too large"))?,
            None => 100,
        };

        let trust_forwarded_for = lookup("TRUST_FORWARDED_FOR")
            .unwrap_or_else(|| "false".to_string())
            .parse()?;

        Ok(Self {
            port,
            api_base_url,
            api_key,
            api_timeout,
            rate_limit_per_minute,
            trust_forwarded_for,
        })
    }
}

fn positive(value: &str, name: &str) -> anyhow::Result<u64> {
    match value.trim().parse::<u64>()? {
        0 => anyhow::bail!("{name} must be greater than zero"),
        n => Ok(n),
    }
}
