//! Configuration for the hosted services.
//!
//! Loads from environment variables:
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SUPABASE_URL` | yes | |
//! | `SUPABASE_ANON_KEY` | yes | |
//! | `APP_BASE_URL` | no | `http://localhost:5173` |
//! | `BASECAMP_HTTP_TIMEOUT_SECS` | no | `30` |

use crate::error::ConfigError;
use std::env;
use std::fmt;
use std::time::Duration;

/// Default public URL of the web app.
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:5173";

/// Default request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the hosted backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub supabase_url: String,
    /// Public (anonymous) API key.
    pub anon_key: String,
    /// Public URL of the web app; checkout return URLs hang off it.
    pub app_base_url: String,
    /// Per-request timeout.
    pub http_timeout: Duration,
}

impl Config {
    /// Create configuration for `supabase_url` with the default app URL and
    /// timeout.
    #[must_use]
    pub fn new(supabase_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` if `SUPABASE_URL` or `SUPABASE_ANON_KEY` is unset
    /// - `ConfigError::Invalid` if `BASECAMP_HTTP_TIMEOUT_SECS` is not a
    ///   positive number of seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url =
            env::var("SUPABASE_URL").map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key =
            env::var("SUPABASE_ANON_KEY").map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let mut config = Self::new(supabase_url, anon_key);
        if let Ok(base) = env::var("APP_BASE_URL") {
            config = config.with_app_base_url(base);
        }
        if let Ok(raw) = env::var("BASECAMP_HTTP_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    var: "BASECAMP_HTTP_TIMEOUT_SECS",
                    value: raw,
                })?;
            config = config.with_http_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Set the public app URL.
    #[must_use]
    pub fn with_app_base_url(mut self, app_base_url: impl Into<String>) -> Self {
        self.app_base_url = app_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// `{supabase_url}/rest/v1`
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    /// `{supabase_url}/auth/v1`
    #[must_use]
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }

    /// `{supabase_url}/functions/v1`
    #[must_use]
    pub fn functions_url(&self) -> String {
        format!("{}/functions/v1", self.supabase_url)
    }

    /// Build an HTTP client honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// `ConfigError::Client` if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("anon_key", &"<redacted>")
            .field("app_base_url", &self.app_base_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
