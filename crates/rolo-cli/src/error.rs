use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] rolo_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("iCloud is not configured. Set icloud.service_root and icloud.cookie in {0}.")]
    RemoteNotConfigured(String),
    #[error("No vault root configured. Pass --vault or set vault_root in {0}.")]
    VaultNotConfigured(String),
}
