//! Typed error definitions for Mangaport.
//!
//! Every error here is:
//!
//! - **Serializable** for API responses via serde
//! - **Matchable** for recovery logic via enum variants

mod config;
mod gateway;

pub use config::ConfigError;
pub use gateway::{GatewayError, GatewayFailure};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = GatewayError::UpstreamRejection {
            provider: "mangadex".to_string(),
            status: 404,
            status_text: "Not Found".to_string(),
            body: "<html>nope</html>".to_string(),
        };

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("UpstreamRejection"));
        assert!(json.contains("<html>nope</html>"));

        let deserialized: GatewayError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError {
            field: "port".to_string(),
            message: "out of range".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("port"));
        assert!(msg.contains("out of range"));
    }
}
