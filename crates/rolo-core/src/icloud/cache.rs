//! On-disk copy of the last remote fetch, for offline iteration.

use std::path::{Path, PathBuf};

use super::client::ContactsService;
use super::model::RemoteSnapshot;
use super::token::SyncSession;
use crate::error::{Error, Result};
use crate::store::{read_json_or_default, write_json_atomically};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCache {
    path: PathBuf,
}

impl RemoteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<RemoteSnapshot> {
        tracing::info!("Reading remote data from cache {}", self.path.display());
        if !self.path.exists() {
            return Err(Error::InvalidInput(format!(
                "no cached remote data at {}; run without --cached first",
                self.path.display()
            )));
        }
        read_json_or_default(&self.path)
    }

    pub fn save(&self, snapshot: &RemoteSnapshot) -> Result<()> {
        write_json_atomically(&self.path, snapshot)
    }
}

/// Fetch everything from the service and refresh the cache with it.
pub async fn fetch_and_cache(
    service: &dyn ContactsService,
    session: &mut SyncSession,
    cache: &RemoteCache,
) -> Result<RemoteSnapshot> {
    let snapshot = service.get_contacts_and_groups(session).await?;
    cache.save(&snapshot)?;
    Ok(snapshot)
}
