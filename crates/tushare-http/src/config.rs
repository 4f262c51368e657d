//! Client configuration and environment loading.

use std::fmt;
use std::time::Duration;

use tushare_core::{Result, TushareError};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "http://api.tushare.pro";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the credential token.
pub const TOKEN_ENV: &str = "TUSHARE_TOKEN";

/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "TUSHARE_API_URL";

/// Environment variable overriding the timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "TUSHARE_TIMEOUT_SECS";

/// Connection settings of a [`TushareClient`](crate::TushareClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Credential token. Queries fail with `Auth` while it is empty.
    pub token: String,
    /// Endpoint every query is posted to.
    pub api_url: String,
    /// Bound on each HTTP exchange.
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with the given token and default endpoint/timeout.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Reads `TUSHARE_TOKEN`, `TUSHARE_API_URL` and `TUSHARE_TIMEOUT_SECS`.
    ///
    /// Unset or empty variables keep their defaults. A missing token is not an
    /// error here; queries report it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(token) = get(TOKEN_ENV) {
            config.token = token;
        }
        if let Some(url) = get(API_URL_ENV) {
            config.api_url = url;
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            let secs: u64 = secs.parse().map_err(|_| {
                TushareError::InvalidParameter(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
