//! XDG config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// XDG-compliant config store
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a new XDG config store with default path
    pub fn new() -> Self {
        let config_dir = config_root(dirs::config_dir(), dirs::home_dir()).join("clipgate");

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse TOML content into AppConfig
    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Serialize AppConfig to TOML
    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config)
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

/// Platform config dir, else `~/.config`, else the temp dir. Never relative.
fn config_root(config_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> PathBuf {
    config_dir
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(std::env::temp_dir)
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            // Return empty config if file doesn't exist
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config = Self::parse_toml(&content)?;
        tracing::debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        let defaults = AppConfig::defaults();
        self.save(&defaults).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{CatalogConfig, GateConfig};

    #[test]
    fn default_path_is_xdg() {
        let store = XdgConfigStore::new();
        let path = store.path();
        assert!(path.to_string_lossy().contains("clipgate"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn config_root_falls_back_to_home() {
        let home = PathBuf::from("/home/someone");
        assert_eq!(
            config_root(None, Some(home.clone())),
            home.join(".config")
        );
        assert_eq!(
            config_root(Some(PathBuf::from("/xdg")), Some(home)),
            PathBuf::from("/xdg")
        );
        assert!(config_root(None, None).is_absolute());
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_sections() {
        let content = r#"
[gate]
retry_interval = "5ms"
backoff = "fixed"

[catalog]
max_name_len = 128
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        let gate = config.gate.as_ref().unwrap();
        assert_eq!(gate.retry_interval, Some("5ms".to_string()));
        assert_eq!(gate.retry_deadline, None);
        assert_eq!(gate.backoff, Some("fixed".to_string()));
        assert_eq!(config.max_name_len_or_default(), 128);
    }

    #[test]
    fn parse_toml_rejects_garbage() {
        let err = XdgConfigStore::parse_toml("[gate\nretry").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn to_toml_round_trip() {
        let config = AppConfig {
            gate: Some(GateConfig {
                retry_interval: Some("20ms".to_string()),
                retry_deadline: Some("1s".to_string()),
                backoff: None,
            }),
            catalog: Some(CatalogConfig {
                max_name_len: Some(64),
            }),
        };

        let toml = XdgConfigStore::to_toml(&config).unwrap();
        let parsed = XdgConfigStore::parse_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = std::env::temp_dir().join(format!("clipgate-config-{}", std::process::id()));
        let store = XdgConfigStore::with_path(dir.join("config.toml"));
        let _ = std::fs::remove_dir_all(&dir);

        store.init().await.unwrap();
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());
        assert!(matches!(store.init().await, Err(ConfigError::AlreadyExists(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
