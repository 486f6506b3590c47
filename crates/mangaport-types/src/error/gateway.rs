//! Gateway errors and the uniform failure shape handed to callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced at the gateway boundary.
///
/// Nothing above the gateway ever sees a raw transport error: reqwest failures
/// are folded into [`GatewayError::Network`] / [`GatewayError::Timeout`].
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum GatewayError {
    /// Recognized provider with no base URL bound. Not retryable.
    #[error("Base URL for {provider} not configured")]
    Configuration { provider: String },

    /// Unknown provider name or malformed path. Never reaches the network.
    #[error("{message}")]
    InvalidRequest { message: String },

    /// Upstream answered with a non-2xx status.
    #[error("API request failed: {status_text}")]
    UpstreamRejection {
        provider: String,
        status: u16,
        status_text: String,
        /// Raw response body, not assumed to be JSON
        body: String,
    },

    /// No response at all (DNS, connect, reset).
    #[error("Upstream {provider} unreachable: {message}")]
    Network { provider: String, message: String },

    /// Transport timeout while waiting for the upstream.
    #[error("Upstream {provider} timed out: {message}")]
    Timeout { provider: String, message: String },

    /// 2xx response whose body did not decode as JSON.
    #[error("Upstream {provider} returned an undecodable payload: {message}")]
    InvalidPayload { provider: String, status: u16, message: String },

    /// The page-server limiter could not grant a permit within the cutoff.
    #[error("Rate limiter wait exceeded {waited_ms}ms")]
    RateLimitTimeout { waited_ms: u64 },
}

impl GatewayError {
    /// Shorthand for an unknown provider name.
    pub fn invalid_api_name() -> Self {
        Self::InvalidRequest { message: "Invalid API name".to_string() }
    }

    /// HTTP status this error surfaces as.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Configuration { .. } => 500,
            Self::InvalidRequest { .. } => 400,
            Self::UpstreamRejection { status, .. } => *status,
            Self::Network { .. } => 502,
            Self::Timeout { .. } => 504,
            Self::InvalidPayload { .. } => 502,
            Self::RateLimitTimeout { .. } => 503,
        }
    }

    /// Whether a caller may sensibly retry (UI shows a retry affordance).
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration { .. } | Self::InvalidRequest { .. })
    }

    /// Upstream was never reached or never answered.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Optional detail text for the uniform failure shape.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::UpstreamRejection { body, .. } => Some(body.clone()),
            Self::Network { message, .. }
            | Self::Timeout { message, .. }
            | Self::InvalidPayload { message, .. } => Some(message.clone()),
            _ => None,
        }
    }

    /// Convert into the caller-facing `{error: true, status, message, details?}` shape.
    pub fn to_failure(&self) -> GatewayFailure {
        GatewayFailure {
            error: true,
            status: self.http_status(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

/// Uniform failure shape returned by `Gateway::call` consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayFailure {
    pub error: bool,
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            GatewayError::Configuration { provider: "kitsu".to_string() }.http_status(),
            500
        );
        assert_eq!(GatewayError::invalid_api_name().http_status(), 400);
        assert_eq!(
            GatewayError::UpstreamRejection {
                provider: "mangadex".to_string(),
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }
            .http_status(),
            404
        );
        assert_eq!(
            GatewayError::Network { provider: "kitsu".to_string(), message: "reset".to_string() }
                .http_status(),
            502
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = GatewayError::Configuration { provider: "mangadex".to_string() };
        assert_eq!(err.to_string(), "Base URL for mangadex not configured");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_network_distinct_from_rejection() {
        let network =
            GatewayError::Network { provider: "kitsu".to_string(), message: "dns".to_string() };
        let rejected = GatewayError::UpstreamRejection {
            provider: "kitsu".to_string(),
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: "busy".to_string(),
        };

        assert!(network.is_transport_failure());
        assert!(!rejected.is_transport_failure());
        assert!(network.is_retryable());
        assert!(rejected.is_retryable());
    }

    #[test]
    fn test_failure_shape() {
        let failure = GatewayError::UpstreamRejection {
            provider: "mangadex".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
            body: "not json at all".to_string(),
        }
        .to_failure();

        assert!(failure.error);
        assert_eq!(failure.status, 404);
        assert_eq!(failure.message, "API request failed: Not Found");
        assert_eq!(failure.details.as_deref(), Some("not json at all"));

        let json = serde_json::to_value(GatewayError::invalid_api_name().to_failure())
            .unwrap_or_default();
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Invalid API name");
        assert!(json.get("details").is_none());
    }
}
