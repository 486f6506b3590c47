use mangaport_types::{ConfigError, GatewayConfig, Provider};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_DIR: &str = ".mangaport";
const CONFIG_FILE: &str = "mangaport.json";

pub const DATA_DIR_ENV: &str = "MANGAPORT_DATA_DIR";
pub const PORT_ENV: &str = "MANGAPORT_PORT";
pub const HOST_ENV: &str = "MANGAPORT_HOST";

/// Get the data directory path, creating it if missing.
///
/// `MANGAPORT_DATA_DIR` wins over `~/.mangaport`.
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let data_dir = if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::DataDir {
            message: "Cannot get home directory".to_string(),
        })?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| ConfigError::DataDir {
            message: format!("Failed to create data directory: {}", e),
        })?;
    }

    Ok(data_dir)
}

/// Load configuration: file, then environment, then validation.
pub fn load_config() -> Result<GatewayConfig, ConfigError> {
    let data_dir = get_data_dir()?;
    load_config_with(&data_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit directory and env lookup.
pub fn load_config_with<F>(data_dir: &Path, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = read_config_file(data_dir)?;
    apply_env_overrides(&mut config, env)?;
    config.check()?;
    Ok(config)
}

/// Parse `mangaport.json`; a missing file yields defaults.
pub fn read_config_file(data_dir: &Path) -> Result<GatewayConfig, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!("No config file at {}, using defaults", config_path.display());
        return Ok(GatewayConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Apply `MANGADEX_API_URL`, `KITSU_API_URL`, `MANGAPORT_PORT` and `MANGAPORT_HOST`.
///
/// Empty values are ignored so an exported-but-blank variable does not bind
/// a provider to nothing.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    for provider in Provider::ALL {
        if let Some(base_url) = non_empty(provider.env_var()) {
            tracing::debug!("{} bound from {}", provider, provider.env_var());
            config.set_base_url(provider, &base_url);
        }
    }

    if let Some(port) = non_empty(PORT_ENV) {
        config.port = port.trim().parse().map_err(|_| ConfigError::ValidationError {
            field: "port".to_string(),
            message: format!("Invalid port number: {}", port),
        })?;
    }

    if let Some(host) = non_empty(HOST_ENV) {
        config.host = host.trim().to_string();
    }

    Ok(())
}

/// Write the configuration atomically into the data directory.
pub fn save_config(data_dir: &Path, config: &GatewayConfig) -> Result<PathBuf, ConfigError> {
    let config_path = data_dir.join(CONFIG_FILE);
    let temp_path = data_dir.join(format!("{}.tmp", CONFIG_FILE));

    let content =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::from_json_error(&e))?;

    fs::write(&temp_path, content).map_err(|e| ConfigError::WriteError {
        message: format!("Failed to write temp config: {}", e),
    })?;
    fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
        message: format!("Failed to save config: {}", e),
    })?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_with(dir.path(), env_from(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_env_binds_providers() {
        let dir = TempDir::new().unwrap();
        let config = load_config_with(
            dir.path(),
            env_from(&[
                ("MANGADEX_API_URL", "https://api.mangadex.org/"),
                ("KITSU_API_URL", "https://kitsu.io/api/edge"),
            ]),
        )
        .unwrap();

        let mangadex = config.provider(Provider::MangaDex).unwrap();
        assert_eq!(mangadex.base_url, "https://api.mangadex.org");
        assert!(config.provider(Provider::Kitsu).is_some());
    }

    #[test]
    fn test_blank_env_leaves_provider_unbound() {
        let dir = TempDir::new().unwrap();
        let config =
            load_config_with(dir.path(), env_from(&[("KITSU_API_URL", "   ")])).unwrap();
        assert!(config.provider(Provider::Kitsu).is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"port": 9000, "providers": [{"name": "kitsu", "base_url": "https://old.example"}]}"#,
        )
        .unwrap();

        let config = load_config_with(
            dir.path(),
            env_from(&[("KITSU_API_URL", "https://new.example"), ("MANGAPORT_PORT", "9100")]),
        )
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].base_url, "https://new.example");
    }

    #[test]
    fn test_invalid_port_env() {
        let dir = TempDir::new().unwrap();
        let err = load_config_with(dir.path(), env_from(&[("MANGAPORT_PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "port"));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = load_config_with(dir.path(), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let dir = TempDir::new().unwrap();
        let err = load_config_with(dir.path(), env_from(&[("MANGADEX_API_URL", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_save_then_read() {
        let dir = TempDir::new().unwrap();
        let mut config = GatewayConfig::default();
        config.set_base_url(Provider::MangaDex, "https://api.mangadex.org");

        let path = save_config(dir.path(), &config).unwrap();
        assert!(path.ends_with(CONFIG_FILE));
        assert!(!dir.path().join("mangaport.json.tmp").exists());

        let loaded = read_config_file(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
