use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rolo_core::icloud::{ICloudContactsClient, RemoteCache};
use rolo_core::store::ContactStore;

use crate::config::{default_config_path, RoloConfig};
use crate::error::CliError;

/// Everything a command needs to locate local and remote data.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: RoloConfig,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub cache_path: PathBuf,
}

impl Context {
    pub fn resolve(
        config_path: Option<&Path>,
        data_dir: Option<&Path>,
        cache_path: Option<&Path>,
    ) -> Result<Self, CliError> {
        let config_path = config_path.map_or_else(default_config_path, Path::to_path_buf);
        let config = RoloConfig::load_from_path(&config_path).map_err(CliError::Config)?;
        Ok(Self::from_config(config, config_path, data_dir, cache_path))
    }

    pub fn from_config(
        config: RoloConfig,
        config_path: PathBuf,
        data_dir: Option<&Path>,
        cache_path: Option<&Path>,
    ) -> Self {
        let data_dir = config.resolve_data_dir(data_dir);
        let cache_path = config.resolve_cache_path(cache_path, &data_dir);
        tracing::debug!(
            "Using data dir {} and cache {}",
            data_dir.display(),
            cache_path.display()
        );
        Self {
            config,
            config_path,
            data_dir,
            cache_path,
        }
    }

    pub fn store(&self) -> ContactStore {
        ContactStore::new(&self.data_dir)
    }

    pub fn cache(&self) -> RemoteCache {
        RemoteCache::new(&self.cache_path)
    }

    pub fn ignored_uuids(&self) -> HashSet<String> {
        self.config.ignored_uuids()
    }

    pub fn remote_client(&self) -> Result<ICloudContactsClient, CliError> {
        if self.config.icloud.service_root.is_none() {
            return Err(CliError::RemoteNotConfigured(
                self.config_path.display().to_string(),
            ));
        }
        Ok(ICloudContactsClient::new(&self.config.icloud)?)
    }
}

/// Surround `text` with a box drawn from `+`, `-` and `|`.
pub fn bordered(text: &str) -> String {
    let lines = text.lines().collect::<Vec<_>>();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let edge = format!("+{}+", "-".repeat(width + 2));

    let mut output = vec![edge.clone()];
    output.extend(lines.iter().map(|line| {
        let padding = width - line.chars().count();
        format!("| {line}{} |", " ".repeat(padding))
    }));
    output.push(edge);
    output.join("\n")
}

/// Lay two blocks of text out in columns.
pub fn beside(left: &str, right: &str) -> String {
    let left_lines = left.lines().collect::<Vec<_>>();
    let right_lines = right.lines().collect::<Vec<_>>();
    let width = left_lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    (0..left_lines.len().max(right_lines.len()))
        .map(|index| {
            let left_line = left_lines.get(index).copied().unwrap_or_default();
            let right_line = right_lines.get(index).copied().unwrap_or_default();
            let padding = width - left_line.chars().count();
            format!("{left_line}{}  {right_line}", " ".repeat(padding))
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
