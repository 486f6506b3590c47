//! Gateway configuration.
//!
//! Loaded once at process start and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::provider::Provider;
use crate::error::ConfigError;

/// Upstream binding for one provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: Provider,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Headers attached to every outbound call (credentials live here)
    #[serde(default)]
    pub static_headers: BTreeMap<String, String>,
}

impl ProviderConfig {
    pub fn new(name: Provider, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            name,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            static_headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_headers.insert(name.into(), value.into());
        self
    }
}

/// Admission budget for the page-server endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct PageLimitConfig {
    /// Max permits per window
    #[validate(range(min = 1_u32))]
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Window length in milliseconds
    #[validate(range(min = 1000_u64))]
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Slack added to every computed wait
    #[serde(default = "default_buffer_ms")]
    pub buffer_ms: u64,
    /// Optional cutoff; `None` waits as long as needed
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

impl Default for PageLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_page_limit(),
            window_ms: default_window_ms(),
            buffer_ms: default_buffer_ms(),
            max_wait_ms: None,
        }
    }
}

/// Full gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct GatewayConfig {
    /// Bind address for the HTTP boundary
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[validate(range(min = 1024_u16, max = 65535_u16))]
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upstream request timeout in seconds
    #[validate(range(min = 5_u64, max = 600_u64))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Bound providers; a provider missing here is unconfigured
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Page-server limiter
    #[serde(default)]
    #[validate(nested)]
    pub page_limit: PageLimitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            providers: Vec::new(),
            page_limit: PageLimitConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Binding for `provider`, if any.
    pub fn provider(&self, provider: Provider) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == provider)
    }

    /// Bind (or rebind) a provider's base URL.
    pub fn set_base_url(&mut self, provider: Provider, base_url: &str) {
        let trimmed = base_url.trim().trim_end_matches('/').to_string();
        match self.providers.iter_mut().find(|p| p.name == provider) {
            Some(existing) => existing.base_url = trimmed,
            None => self.providers.push(ProviderConfig::new(provider, trimmed)),
        }
    }

    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Derive-based validation plus checks validator cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::from_validation(&e))?;

        let mut seen = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            if seen.contains(&provider.name) {
                return Err(ConfigError::ValidationError {
                    field: "providers".to_string(),
                    message: format!("{} bound more than once", provider.name),
                });
            }
            seen.push(provider.name);

            let parsed = url::Url::parse(&provider.base_url).map_err(|e| {
                ConfigError::ValidationError {
                    field: format!("providers.{}.base_url", provider.name),
                    message: e.to_string(),
                }
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::ValidationError {
                    field: format!("providers.{}.base_url", provider.name),
                    message: format!("unsupported scheme {}", parsed.scheme()),
                });
            }
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub const fn default_port() -> u16 {
    8046
}

pub const fn default_request_timeout() -> u64 {
    30
}

pub const fn default_page_limit() -> u32 {
    40
}

pub const fn default_window_ms() -> u64 {
    60_000
}

pub const fn default_buffer_ms() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = GatewayConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.page_limit.limit, 40);
        assert_eq!(config.page_limit.window_ms, 60_000);
    }

    #[test]
    fn test_set_base_url_trims_and_replaces() {
        let mut config = GatewayConfig::default();
        config.set_base_url(Provider::MangaDex, "https://api.mangadex.org/");
        config.set_base_url(Provider::MangaDex, " https://api.mangadex.dev// ");

        assert_eq!(config.providers.len(), 1);
        assert_eq!(
            config.provider(Provider::MangaDex).map(|p| p.base_url.as_str()),
            Some("https://api.mangadex.dev")
        );
        assert!(config.provider(Provider::Kitsu).is_none());
    }

    #[test]
    fn test_rejects_bad_url() {
        let mut config = GatewayConfig::default();
        config.set_base_url(Provider::Kitsu, "not a url");
        match config.check() {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "providers.kitsu.base_url");
            },
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_duplicate_provider() {
        let mut config = GatewayConfig::default();
        config.providers.push(ProviderConfig::new(Provider::Kitsu, "https://kitsu.io/api/edge"));
        config.providers.push(ProviderConfig::new(Provider::Kitsu, "https://kitsu.app/api/edge"));
        assert!(config.check().is_err());
    }

    #[test]
    fn test_rejects_low_port() {
        let config = GatewayConfig { port: 80, ..GatewayConfig::default() };
        match config.check() {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "port"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"providers":[{"name":"mangadex","base_url":"https://api.mangadex.org"}]}"#;
        let config: GatewayConfig = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(config.port, default_port());
        assert_eq!(config.page_limit, PageLimitConfig::default());
        assert!(config.provider(Provider::MangaDex).is_some());
    }
}
