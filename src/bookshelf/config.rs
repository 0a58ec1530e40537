use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for reaching the catalog server, stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Base URL of the server, without a trailing slash
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_load_path")]
    pub load_path: String,

    #[serde(default = "default_save_path")]
    pub save_path: String,

    #[serde(default = "default_register_path")]
    pub register_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout", rename = "timeout")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_load_path() -> String {
    "/fetch_books.php".to_string()
}

fn default_save_path() -> String {
    "/update_books.php".to_string()
}

fn default_register_path() -> String {
    "/register_books.php".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            load_path: default_load_path(),
            save_path: default_save_path(),
            register_path: default_register_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl CatalogConfig {
    pub const KEYS: [&'static str; 5] = [
        "server-url",
        "load-path",
        "save-path",
        "register-path",
        "timeout",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: CatalogConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "server-url" => Some(self.server_url.clone()),
            "load-path" => Some(self.load_path.clone()),
            "save-path" => Some(self.save_path.clone()),
            "register-path" => Some(self.register_path.clone()),
            "timeout" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Sets a key by name. Returns a user-facing message on bad keys or values.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "server-url" => self.set_server_url(value),
            "load-path" => self.load_path = normalize_path(value),
            "save-path" => self.save_path = normalize_path(value),
            "register-path" => self.register_path = normalize_path(value),
            "timeout" => {
                self.timeout_secs = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        format!("timeout must be a positive number of seconds, got '{}'", value)
                    })?;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn set_server_url(&mut self, url: &str) {
        self.server_url = url.trim().trim_end_matches('/').to_string();
    }

    /// Full URL for one of the configured paths.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "server-url must start with http:// or https://, got '{}'",
                self.server_url
            )));
        }
        Ok(())
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(
            config.endpoint(&config.load_path),
            "http://localhost:8080/fetch_books.php"
        );
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = CatalogConfig::load(temp.path().join("nope")).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let mut config = CatalogConfig::default();
        config.set("server-url", "https://books.example/").unwrap();
        config.set("timeout", "5").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = CatalogConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.server_url, "https://books.example");
        assert_eq!(loaded.timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"{"server-url":"http://10.0.0.2"}"#,
        )
        .unwrap();

        let config = CatalogConfig::load(temp.path()).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.2");
        assert_eq!(config.save_path, "/update_books.php");
    }

    #[test]
    fn test_set_path_adds_leading_slash() {
        let mut config = CatalogConfig::default();
        config.set("save-path", "api/save").unwrap();
        assert_eq!(config.save_path, "/api/save");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = CatalogConfig::default();
        assert!(config.set("timeout", "0").is_err());
        assert!(config.set("timeout", "soon").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_validate_requires_http_scheme() {
        let mut config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        config.set_server_url("ftp://books");
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_list_all_covers_every_key() {
        let config = CatalogConfig::default();
        let keys: Vec<_> = config.list_all().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CatalogConfig::KEYS.to_vec());
    }
}
