//! Application configuration
//!
//! TOML file under the platform config directory. Every field has a
//! default so a missing or partial file still loads.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Override for the thumbnail cache directory.
    pub thumbnail_cache_dir: Option<PathBuf>,
    /// Override for the view counter store file.
    pub view_store_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "almanac", "almanac")
            .context("Failed to determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Directory where generated thumbnails are kept.
    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.thumbnail_cache_dir {
            return dir.clone();
        }
        match ProjectDirs::from("com", "almanac", "almanac") {
            Some(dirs) => dirs.cache_dir().join("thumbnails"),
            None => std::env::temp_dir().join("almanac-thumbnails"),
        }
    }

    /// Location of the persisted view counters.
    pub fn view_store_path(&self) -> PathBuf {
        if let Some(path) = &self.view_store_path {
            return path.clone();
        }
        match ProjectDirs::from("com", "almanac", "almanac") {
            Some(dirs) => dirs.data_dir().join("views.json"),
            None => std::env::temp_dir().join("almanac-views.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("view_store_path = \"/tmp/views.json\"").unwrap();
        assert_eq!(config.view_store_path, Some(PathBuf::from("/tmp/views.json")));
        assert!(config.thumbnail_cache_dir.is_none());
    }

    #[test]
    fn empty_config_loads() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.view_store_path.is_none());
    }
}
