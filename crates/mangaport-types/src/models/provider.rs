//! Closed set of upstream providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Upstream providers reachable through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Primary-content provider: chapters and page-server manifests.
    MangaDex,
    /// Metadata-art provider: titles, posters, covers, ratings.
    Kitsu,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::MangaDex, Provider::Kitsu];

    /// Route name used in `/api/proxy/<name>/...`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MangaDex => "mangadex",
            Self::Kitsu => "kitsu",
        }
    }

    /// Logical role name, accepted as an alias when parsing.
    pub const fn role(self) -> &'static str {
        match self {
            Self::MangaDex => "primary-content",
            Self::Kitsu => "metadata-art",
        }
    }

    /// Environment variable carrying this provider's base URL.
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::MangaDex => "MANGADEX_API_URL",
            Self::Kitsu => "KITSU_API_URL",
        }
    }

    /// Array parameters this provider expects as a single comma-joined value.
    pub const fn comma_joined_params(self) -> &'static [&'static str] {
        match self {
            Self::MangaDex => &["manga"],
            Self::Kitsu => &[],
        }
    }

    /// Whether `path` targets the quota-limited page-server endpoint.
    pub fn is_rate_limited_path(self, path: &str) -> bool {
        match self {
            Self::MangaDex => path.trim_start_matches('/').starts_with("at-home/server/"),
            Self::Kitsu => false,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mangadex" | "primary-content" => Ok(Self::MangaDex),
            "kitsu" | "metadata-art" => Ok(Self::Kitsu),
            _ => Err(GatewayError::invalid_api_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("mangadex".parse::<Provider>(), Ok(Provider::MangaDex));
        assert_eq!("primary-content".parse::<Provider>(), Ok(Provider::MangaDex));
        assert_eq!("kitsu".parse::<Provider>(), Ok(Provider::Kitsu));
        assert_eq!("metadata-art".parse::<Provider>(), Ok(Provider::Kitsu));
        assert_eq!("anilist".parse::<Provider>(), Err(GatewayError::invalid_api_name()));
        assert_eq!("MangaDex".parse::<Provider>(), Err(GatewayError::invalid_api_name()));
    }

    #[test]
    fn test_rate_limited_path() {
        assert!(Provider::MangaDex.is_rate_limited_path("at-home/server/abc"));
        assert!(Provider::MangaDex.is_rate_limited_path("/at-home/server/abc"));
        assert!(!Provider::MangaDex.is_rate_limited_path("manga/abc"));
        assert!(!Provider::Kitsu.is_rate_limited_path("at-home/server/abc"));
    }

    #[test]
    fn test_serde_names_match_routes() {
        for provider in Provider::ALL {
            let json = serde_json::to_value(provider).unwrap_or_default();
            assert_eq!(json, provider.as_str());
        }
    }
}
