use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use access_client::client::DEFAULT_BASE_URL;

/// Runtime configuration of the bridge.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Listen address for the SCIM HTTP server.
    pub listen_addr: SocketAddr,

    /// Cloudflare API token with Access group edit rights.
    pub api_token: String,

    /// Cloudflare account owning the Access groups.
    pub account_id: String,

    /// Static token SCIM clients must present as `Authorization: Bearer`.
    pub bearer_token: String,

    /// Cloudflare API root, overridable for testing.
    pub api_base_url: String,

    /// Timeout of each Cloudflare API call.
    pub request_timeout: Duration,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("listen_addr", &self.listen_addr)
            .field("api_token", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .field("bearer_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let required = |key: &str| {
            reader(key)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.into()))
        };

        let api_token = required("CLOUDFLARE_API_TOKEN")?;
        let account_id = required("CLOUDFLARE_ACCESS_ACCOUNT_ID")?;
        let bearer_token = required("BEARER_TOKEN")?;

        let listen_addr = reader("SCIM_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:7643".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("SCIM_LISTEN_ADDR".into(), e.to_string()))?;

        let api_base_url =
            reader("CLOUDFLARE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = reader("CLOUDFLARE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("CLOUDFLARE_REQUEST_TIMEOUT_SECS".into(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "CLOUDFLARE_REQUEST_TIMEOUT_SECS".into(),
                "must be greater than zero".into(),
            ));
        }

        let log_filter =
            reader("LOG_FILTER").unwrap_or_else(|_| "info,access_scim=debug".to_string());

        Ok(Self {
            listen_addr,
            api_token,
            account_id,
            bearer_token,
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_filter,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
