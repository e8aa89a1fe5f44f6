use crate::validation::ValidatorOptions;
use crate::validation::syntax::SyntaxOptions;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Service configuration loaded from environment variables.
///
/// Every field has a default suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Redis for the DNS records cache; no cache when unset.
    pub redis_url: Option<String>,
    /// Lifetime of cached DNS records in seconds (default: `3600`).
    pub dns_cache_ttl_secs: u64,
    /// Per-query DNS timeout in milliseconds (default: `2000`).
    pub dns_timeout_ms: u64,
    /// Accept domains without a dot, like `user@intranet` (default: `false`).
    pub allow_single_label_domains: bool,
    /// Accept special-use domains such as `localhost` or `*.test` (default: `false`).
    pub allow_special_use_domains: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                      | Default     |
    /// |------------------------------|-------------|
    /// | `HOST`                       | `127.0.0.1` |
    /// | `PORT`                       | `8080`      |
    /// | `REDIS_URL`                  | unset       |
    /// | `DNS_CACHE_TTL_SECS`         | `3600`      |
    /// | `DNS_TIMEOUT_MS`             | `2000`      |
    /// | `ALLOW_SINGLE_LABEL_DOMAINS` | `false`     |
    /// | `ALLOW_SPECIAL_USE_DOMAINS`  | `false`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`AppConfig::from_env`], reading variables through `lookup`.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".into()),
            port: parse_or(var("PORT"), "PORT", "port number", 8080)?,
            redis_url: var("REDIS_URL"),
            dns_cache_ttl_secs: parse_or(
                var("DNS_CACHE_TTL_SECS"),
                "DNS_CACHE_TTL_SECS",
                "number of seconds",
                3600,
            )?,
            dns_timeout_ms: parse_or(
                var("DNS_TIMEOUT_MS"),
                "DNS_TIMEOUT_MS",
                "number of milliseconds",
                2000,
            )?,
            allow_single_label_domains: parse_or(
                var("ALLOW_SINGLE_LABEL_DOMAINS"),
                "ALLOW_SINGLE_LABEL_DOMAINS",
                "boolean",
                false,
            )?,
            allow_special_use_domains: parse_or(
                var("ALLOW_SPECIAL_USE_DOMAINS"),
                "ALLOW_SPECIAL_USE_DOMAINS",
                "boolean",
                false,
            )?,
        })
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions {
            syntax: SyntaxOptions {
                allow_single_label_domain: self.allow_single_label_domains,
                allow_special_use_domain: self.allow_special_use_domains,
            },
            dns_timeout: self.dns_timeout(),
        }
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}
