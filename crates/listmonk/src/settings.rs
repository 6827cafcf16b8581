use std::env;
use std::time::Duration;

use crate::ListmonkError;

/// Default Listmonk host on the internal network
pub const DEFAULT_BASE_URL: &str = "http://app:9000";

/// API user the token belongs to
pub const DEFAULT_API_USERNAME: &str = "resendCampaignToUnopeners";

/// Connection settings for a Listmonk instance
#[derive(Debug, Clone)]
pub struct ListmonkSettings {
    /// Root URL of the Listmonk instance, without the `/api` suffix
    pub base_url: String,
    /// API username used for basic auth
    pub username: String,
    /// API token used for basic auth
    pub token: Option<String>,
    /// Per-request timeout; unset leaves reqwest's default of no timeout
    pub timeout: Option<Duration>,
}

impl Default for ListmonkSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: DEFAULT_API_USERNAME.to_string(),
            token: None,
            timeout: None,
        }
    }
}

impl ListmonkSettings {
    /// Reads settings from `LISTMONK_URL`, `LISTMONK_API_USERNAME`,
    /// `LISTMONK_AUTH_TOKEN` and `LISTMONK_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ListmonkError> {
        let defaults = Self::default();

        let base_url = env::var("LISTMONK_URL").unwrap_or(defaults.base_url);
        let username = env::var("LISTMONK_API_USERNAME").unwrap_or(defaults.username);
        let token = env::var("LISTMONK_AUTH_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let timeout = match env::var("LISTMONK_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                ListmonkError::ConfigError(format!("LISTMONK_TIMEOUT_SECS is not a number: {}", raw))
            })?)),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            base_url,
            username,
            token,
            timeout,
        })
    }

    /// Whether an API token is configured
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Base of every API path, always ending in `/api/`
    pub fn api_url(&self) -> String {
        format!("{}/api/", self.base_url.trim_end_matches('/'))
    }
}
