// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User configuration.
//!
//! Read from `<config dir>/tubenotes/config.json`. Every field has a default
//! so partial files keep working as fields are added.

use crate::io::outline::OutlineOrder;
use crate::store::InsertOrder;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `youtube_api_key`.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub insert_order: InsertOrder,
    pub outline_order: OutlineOrder,
    pub playlist_aware: bool,
    pub ticker_interval_ms: u64,
    /// Resume watcher period; 0 turns periodic saving off.
    pub watcher_interval_ms: u64,
    /// Minimum drift, in seconds, before the resume position is saved.
    pub resume_drift_secs: u32,
    pub notifications_enabled: bool,
    pub youtube_api_key: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            insert_order: InsertOrder::Front,
            outline_order: OutlineOrder::Stored,
            playlist_aware: true,
            ticker_interval_ms: 1000,
            watcher_interval_ms: 5000,
            resume_drift_secs: 2,
            notifications_enabled: true,
            youtube_api_key: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the user's configuration. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tubenotes").join("config.json"))
    }

    /// Directory holding the persisted document.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("tubenotes")))
            .unwrap_or_else(|| PathBuf::from(".tubenotes"))
    }

    /// API key for playlist expansion; the environment wins over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.youtube_api_key.clone())
    }

    pub fn ticker_interval(&self) -> Duration {
        Duration::from_millis(self.ticker_interval_ms.max(100))
    }

    pub fn watcher_interval(&self) -> Option<Duration> {
        match self.watcher_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms.max(500))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"insert_order": "back", "resume_drift_secs": 5}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.insert_order, InsertOrder::Back);
        assert_eq!(config.resume_drift_secs, 5);
        assert_eq!(config.outline_order, OutlineOrder::Stored);
        assert!(config.playlist_aware);
        assert_eq!(config.watcher_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            outline_order: OutlineOrder::Chronological,
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.data_dir(), dir.path());
    }

    #[test]
    fn test_intervals_have_floor() {
        let config = Config {
            ticker_interval_ms: 0,
            watcher_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.ticker_interval(), Duration::from_millis(100));
        assert_eq!(config.watcher_interval(), None);
    }
}
