//! Markdown export of contacts into a notes vault.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Contact, Name, PhoneNumber};

/// Where contact notes live, relative to the vault root.
const CONTACTS_SUBDIR: [&str; 3] = ["data", "contacts", "objects"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultExportSummary {
    pub written: usize,
    pub up_to_date: usize,
    pub without_id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultExporter {
    contacts_dir: PathBuf,
}

impl VaultExporter {
    pub fn new(vault_root: &Path) -> Self {
        let contacts_dir = CONTACTS_SUBDIR
            .iter()
            .fold(vault_root.to_path_buf(), |path, part| path.join(part));
        Self { contacts_dir }
    }

    pub fn contacts_dir(&self) -> &Path {
        &self.contacts_dir
    }

    pub fn note_path(&self, id: &str) -> PathBuf {
        self.contacts_dir.join(format!("{id}.md"))
    }

    /// Write one note per contact with a local id.
    ///
    /// An existing note is rewritten only when the contact has no `mtime` or
    /// was modified after the note was last written.
    pub fn export(&self, contacts: &[Contact]) -> Result<VaultExportSummary> {
        fs::create_dir_all(&self.contacts_dir)?;

        let mut summary = VaultExportSummary::default();
        for contact in contacts {
            let Some(id) = contact.id.as_deref() else {
                summary.without_id += 1;
                continue;
            };

            let path = self.note_path(id);
            if !needs_write(&path, contact.mtime)? {
                summary.up_to_date += 1;
                continue;
            }

            fs::write(&path, render_contact_note(contact))?;
            tracing::debug!("Wrote {}", path.display());
            summary.written += 1;
        }
        Ok(summary)
    }
}

fn needs_write(path: &Path, contact_mtime: Option<DateTime<Utc>>) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let Some(contact_mtime) = contact_mtime else {
        return Ok(true);
    };
    let file_mtime = DateTime::<Utc>::from(fs::metadata(path)?.modified()?);
    Ok(contact_mtime > file_mtime)
}

/// Render the vault note for a contact.
pub fn render_contact_note(contact: &Contact) -> String {
    let display_name = build_display_name(&contact.name);
    let phone_numbers = contact
        .phone_numbers
        .as_deref()
        .map(build_phone_numbers)
        .unwrap_or_default();
    let tags = contact
        .tags
        .as_ref()
        .map(|tags| tags.join(", "))
        .unwrap_or_default();

    let mut output = String::new();
    let _ = writeln!(output, "---");
    let _ = writeln!(output, "tags:");
    let _ = writeln!(output, "- contact");
    let _ = writeln!(output);
    let _ = writeln!(output, "obsidian:");
    let _ = writeln!(output, "    display_name: \"{}\"", quoted(&display_name));
    let _ = writeln!(output, "    phone_numbers: \"{}\"", quoted(&phone_numbers));
    let _ = writeln!(output, "    tags: \"{}\"", quoted(&tags));
    let _ = writeln!(output, "---");
    let _ = writeln!(output);
    let _ = writeln!(output, "# {display_name}");
    let _ = writeln!(output);
    let _ = writeln!(output, "---");
    output
}

/// First name, `(nickname)`, last name.
fn build_display_name(name: &Name) -> String {
    let nickname = name.nickname.as_ref().map(|nickname| format!("({nickname})"));
    [
        name.first_name.as_deref(),
        nickname.as_deref(),
        name.last_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

fn build_phone_numbers(phone_numbers: &[PhoneNumber]) -> String {
    phone_numbers
        .iter()
        .map(PhoneNumber::international)
        .collect::<Vec<_>>()
        .join(", ")
}

fn quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
