//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "cms.toml",
    "./config/config.toml",
    "./config/cms.toml",
    "/etc/cms/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    search_standard_paths: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            search_standard_paths: true,
        }
    }

    /// Create a loader with a specific config file path.
    /// Standard paths are not searched.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
            search_standard_paths: false,
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit variable source.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup)?;
        config.validate()?;

        Ok(config)
    }

    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured file does not exist, using defaults");
            return None;
        }

        if let Some(path) = lookup("CMS_CONFIG").map(PathBuf::from) {
            if path.exists() {
                return Some(path);
            }
        }

        if !self.search_standard_paths {
            return None;
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn apply_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(val) = lookup("CMS_HTTP_PORT") {
        config.http.port = val
            .parse()
            .map_err(|_| ConfigError::ValidationError(format!("CMS_HTTP_PORT: invalid port '{}'", val)))?;
    }
    if let Some(val) = lookup("CMS_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("CMS_CORS_ORIGINS") {
        config.http.cors_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Storage
    if let Some(val) = lookup("CMS_STORAGE_BACKEND") {
        config.storage.backend = val.parse()?;
    }
    if let Some(val) = lookup("CMS_CREATE_INDEXES") {
        config.storage.create_indexes = parse_flag(&val);
    }

    // MongoDB
    if let Some(val) = lookup("CMS_MONGODB_URI") {
        config.mongodb.uri = val;
    }
    if let Some(val) = lookup("CMS_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }

    // Media
    if let Some(val) = lookup("CMS_MEDIA_PUBLIC_BASE_URL") {
        config.media.public_base_url = val;
    }

    // Events
    if let Some(val) = lookup("CMS_EVENTS_CHANNEL_CAPACITY") {
        if let Ok(capacity) = val.parse() {
            config.events.channel_capacity = capacity;
        }
    }
    if let Some(val) = lookup("CMS_EVENTS_LOG") {
        config.events.log_events = parse_flag(&val);
    }

    if let Some(val) = lookup("CMS_DEV_MODE") {
        config.dev_mode = parse_flag(&val);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageBackend;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 9000\n\n[mongodb]\ndatabase = \"from_file\"").unwrap();

        let env = vars(&[("CMS_MONGODB_DATABASE", "from_env")]);
        let config = ConfigLoader::with_path(file.path())
            .load_with(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.mongodb.database, "from_env");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::with_path("/nonexistent/cms.toml")
            .load_with(|_| None)
            .unwrap();
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_env_storage_and_flags() {
        let env = vars(&[
            ("CMS_STORAGE_BACKEND", "memory"),
            ("CMS_DEV_MODE", "1"),
            ("CMS_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]);
        let config = ConfigLoader::with_path("/nonexistent/cms.toml")
            .load_with(|key| env.get(key).cloned())
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.dev_mode);
        assert_eq!(config.http.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = vars(&[("CMS_HTTP_PORT", "eighty")]);
        let result = ConfigLoader::with_path("/nonexistent/cms.toml")
            .load_with(|key| env.get(key).cloned());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http\nport = ").unwrap();
        let result = ConfigLoader::with_path(file.path()).load_with(|_| None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
