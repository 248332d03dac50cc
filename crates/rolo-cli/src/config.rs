//! Persistent CLI configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rolo_core::icloud::ICloudSettings;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "rolo";
const CONFIG_FILE_NAME: &str = "config.json";
const CACHE_FILE_NAME: &str = "icloud-cache.json";
const CONFIG_PATH_ENV: &str = "ROLO_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoloConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Directory holding `contacts.json` and `groups.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    /// Notes vault receiving `export-vault` output
    #[serde(default)]
    pub vault_root: Option<PathBuf>,
    #[serde(default)]
    pub icloud: ICloudSettings,
    /// Remote contacts never pulled into the local store
    #[serde(default)]
    pub ignored_uuids: Vec<String>,
}

const fn default_config_version() -> u32 {
    1
}

/// `$ROLO_CONFIG`, else `<config dir>/rolo/config.json`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

impl RoloConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    /// Data directory: explicit flag, then config, then the platform default.
    pub fn resolve_data_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .or(self.data_dir.as_deref())
            .map_or_else(default_data_dir, expand_home)
    }

    /// Cache file: explicit flag, then config, then next to the data.
    pub fn resolve_cache_path(&self, explicit: Option<&Path>, data_dir: &Path) -> PathBuf {
        explicit
            .or(self.cache_path.as_deref())
            .map_or_else(|| data_dir.join(CACHE_FILE_NAME), expand_home)
    }

    pub fn resolve_vault_root(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.or(self.vault_root.as_deref()).map(expand_home)
    }

    pub fn ignored_uuids(&self) -> HashSet<String> {
        self.ignored_uuids.iter().cloned().collect()
    }

    fn normalize(&mut self) {
        self.icloud.normalize();
        self.ignored_uuids = self
            .ignored_uuids
            .iter()
            .map(|uuid| uuid.trim().to_string())
            .filter(|uuid| !uuid.is_empty())
            .collect();
        for path in [&mut self.data_dir, &mut self.cache_path, &mut self.vault_root] {
            if path.as_ref().is_some_and(|value| value.as_os_str().is_empty()) {
                *path = None;
            }
        }
    }
}
