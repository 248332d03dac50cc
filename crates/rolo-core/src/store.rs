//! JSON-file contact store.
//!
//! The data directory holds `contacts.json` (array of contacts) and
//! `groups.json` (array of groups). Both are read and written whole.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Contact, Group};

const CONTACTS_FILE: &str = "contacts.json";
const GROUPS_FILE: &str = "groups.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactStore {
    data_dir: PathBuf,
}

impl ContactStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn contacts_path(&self) -> PathBuf {
        self.data_dir.join(CONTACTS_FILE)
    }

    pub fn groups_path(&self) -> PathBuf {
        self.data_dir.join(GROUPS_FILE)
    }

    /// Load all contacts. A missing file is an empty store.
    pub fn load_contacts(&self) -> Result<Vec<Contact>> {
        read_json_or_default(&self.contacts_path())
    }

    /// Replace the stored contacts.
    pub fn save_contacts(&self, contacts: &[Contact]) -> Result<()> {
        write_json_atomically(&self.contacts_path(), contacts)?;
        tracing::debug!("Wrote {} contacts to {}", contacts.len(), self.data_dir.display());
        Ok(())
    }

    pub fn load_groups(&self) -> Result<Vec<Group>> {
        read_json_or_default(&self.groups_path())
    }

    pub fn save_groups(&self, groups: &[Group]) -> Result<()> {
        write_json_atomically(&self.groups_path(), groups)
    }

    /// Replace contacts and groups together.
    ///
    /// Both files are staged before either is renamed into place, so a
    /// failed write leaves the existing store untouched.
    pub fn save_all(&self, contacts: &[Contact], groups: &[Group]) -> Result<()> {
        let contacts_path = self.contacts_path();
        let groups_path = self.groups_path();

        let staged_contacts = stage_json(&contacts_path, contacts)?;
        let staged_groups = match stage_json(&groups_path, groups) {
            Ok(staged) => staged,
            Err(error) => {
                let _ = fs::remove_file(&staged_contacts);
                return Err(error);
            }
        };

        if let Err(error) = commit_staged(&staged_contacts, &contacts_path) {
            let _ = fs::remove_file(&staged_groups);
            return Err(error);
        }
        commit_staged(&staged_groups, &groups_path)?;
        tracing::debug!(
            "Wrote {} contacts and {} groups to {}",
            contacts.len(),
            groups.len(),
            self.data_dir.display()
        );
        Ok(())
    }
}

/// Parse a JSON file, treating a missing file as `T::default()`.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(error) => Err(error.into()),
    }
}

/// Write pretty JSON through a sibling temp file and rename it into place,
/// so an interrupted write never truncates the existing file.
pub(crate) fn write_json_atomically<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let staged = stage_json(path, value)?;
    commit_staged(&staged, path)
}

/// Write `value` to `<path>.tmp` and return the temp path.
fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }

    let mut serialized = serde_json::to_string_pretty(value)?;
    serialized.push('\n');

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(serialized.as_bytes())?;
    file.sync_all()?;
    Ok(temp_path)
}

fn commit_staged(staged: &Path, path: &Path) -> Result<()> {
    if let Err(error) = fs::rename(staged, path) {
        let _ = fs::remove_file(staged);
        return Err(error.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{GroupMetadata, ICloudMetadata, Name};

    fn contact(first: &str, uuid: &str) -> Contact {
        Contact {
            name: Name {
                first_name: Some(first.to_string()),
                ..Name::default()
            },
            icloud: Some(ICloudMetadata {
                uuid: uuid.to_string(),
                etag: None,
                photo: None,
            }),
            ..Contact::default()
        }
    }

    #[test]
    fn missing_files_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path().join("nested"));
        assert!(store.load_contacts().unwrap().is_empty());
        assert!(store.load_groups().unwrap().is_empty());
    }

    #[test]
    fn contacts_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path().join("data"));
        let contacts = vec![contact("Ada", "A"), contact("Grace", "B")];

        store.save_contacts(&contacts).unwrap();
        assert_eq!(store.load_contacts().unwrap(), contacts);

        store.save_contacts(&contacts[..1]).unwrap();
        assert_eq!(store.load_contacts().unwrap(), contacts[..1].to_vec());
        assert!(!dir.path().join("data/contacts.json.tmp").exists());
    }

    #[test]
    fn groups_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path());
        let groups = vec![Group {
            name: "CTY".into(),
            icloud: GroupMetadata {
                uuid: "G-1".into(),
                etag: Some("C=1".into()),
                contact_uuids: vec!["A".into()],
            },
        }];
        store.save_groups(&groups).unwrap();
        assert_eq!(store.load_groups().unwrap(), groups);
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path());
        fs::write(store.contacts_path(), "[{").unwrap();
        assert!(store.load_contacts().is_err());
    }

    #[test]
    fn save_all_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path().join("data"));
        let contacts = vec![contact("Ada", "A")];
        let groups = vec![Group {
            name: "CTY".into(),
            icloud: GroupMetadata {
                uuid: "G-1".into(),
                etag: None,
                contact_uuids: vec!["A".into()],
            },
        }];

        store.save_all(&contacts, &groups).unwrap();
        assert_eq!(store.load_contacts().unwrap(), contacts);
        assert_eq!(store.load_groups().unwrap(), groups);
        assert!(!dir.path().join("data/contacts.json.tmp").exists());
        assert!(!dir.path().join("data/groups.json.tmp").exists());
    }

    #[test]
    fn failed_groups_write_keeps_contacts() {
        let dir = TempDir::new().unwrap();
        let store = ContactStore::new(dir.path());
        store.save_contacts(&[contact("Ada", "A")]).unwrap();
        let before = fs::read_to_string(store.contacts_path()).unwrap();

        // A directory in the way of the temp file makes staging fail.
        fs::create_dir(dir.path().join("groups.json.tmp")).unwrap();
        let result = store.save_all(&[contact("Grace", "B")], &[]);

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(store.contacts_path()).unwrap(), before);
        assert!(!dir.path().join("contacts.json.tmp").exists());
        assert!(!store.groups_path().exists());
    }
}
