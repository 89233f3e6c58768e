use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

use apap_core::Marketplace;
use apap_upstream::Credentials;

use crate::{error::ConfigError, retry::RetryPolicy};

pub const DEFAULT_PORT: u16 = 1323;
pub const DEFAULT_RETRY_NUMBER: u32 = 3;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub credentials: Credentials,
    pub marketplace: Marketplace,
    pub retry: RetryPolicy,
    pub upstream_timeout: Duration,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(get);

        let port = vars.parsed("APAP_PORT", DEFAULT_PORT)?;
        let partner_tag = vars.required("APAP_AMAZON_ASSOCIATE_TAG")?;
        let access_key = vars.required("APAP_AMAZON_ACCESS_KEY")?;
        let secret_key = vars.required("APAP_AMAZON_SECRET_KEY")?;

        let locale = vars.required("APAP_AMAZON_LOCALE")?;
        let marketplace = locale
            .parse::<Marketplace>()
            .map_err(|source| ConfigError::Locale {
                var: "APAP_AMAZON_LOCALE",
                source,
            })?;

        let retry = RetryPolicy {
            max_retries: vars.parsed("APAP_AMAZON_RETRY_NUMBER", DEFAULT_RETRY_NUMBER)?,
            request_delay: Duration::from_millis(vars.parsed(
                "APAP_AMAZON_REQUEST_DELAY_MILLISECOND",
                DEFAULT_REQUEST_DELAY_MS,
            )?),
            retry_backoff: Duration::from_millis(
                vars.parsed("APAP_AMAZON_RETRY_DELAY_MILLISECOND", DEFAULT_RETRY_DELAY_MS)?,
            ),
        };

        let timeout_secs = vars.parsed("APAP_AMAZON_TIMEOUT_SECOND", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "APAP_AMAZON_TIMEOUT_SECOND",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let log_filter = vars.get("APAP_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            credentials: Credentials {
                partner_tag,
                access_key,
                secret_key,
            },
            marketplace,
            retry,
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_filter,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
                var: key,
                reason: e.to_string(),
                value,
            }),
        }
    }
}
