//! Merging freshly pulled remote contacts into the local store.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::diff::{diff_snapshots, Diff};
use crate::error::{Error, Result};
use crate::icloud::ICloudContact;
use crate::models::Contact;
use crate::transform::icloud_contact_to_contact;

const ETAG_PATH: [&str; 2] = ["icloud", "etag"];

/// Decides whether a remote change should overwrite the local contact.
///
/// Returning an error (e.g. the prompt hit end of input) aborts the pull.
pub trait UpdateReviewer {
    fn review(&mut self, current: &Contact, diff: &Diff) -> Result<bool>;
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The merged contact list, in local order.
    pub contacts: Vec<Contact>,
    pub unchanged: usize,
    pub etag_only: usize,
    pub accepted: usize,
    pub declined: usize,
    /// Pulled contacts with no local counterpart.
    pub unmatched_remote: usize,
}

impl ReconcileReport {
    pub const fn changed(&self) -> usize {
        self.etag_only + self.accepted
    }
}

/// Transform every fetched contact except those on the ignore list.
///
/// The first contact that cannot be transformed fails the whole batch.
pub fn transform_remote_contacts(
    remote_contacts: &[ICloudContact],
    ignored_uuids: &HashSet<String>,
) -> Result<Vec<Contact>> {
    remote_contacts
        .iter()
        .filter(|remote| {
            let ignored = remote
                .contact_id
                .as_ref()
                .is_some_and(|uuid| ignored_uuids.contains(uuid));
            if ignored {
                tracing::debug!("Skipping ignored remote contact {}", remote.describe());
            }
            !ignored
        })
        .map(icloud_contact_to_contact)
        .collect()
}

/// Merge `pulled` into `current`.
///
/// Local contacts keep their position. A linked local contact whose remote
/// counterpart differs only in etag is refreshed silently; any other
/// difference goes to the reviewer. Accepted updates replace the whole
/// record and bump its `mtime`.
pub fn reconcile(
    current: Vec<Contact>,
    pulled: Vec<Contact>,
    reviewer: &mut dyn UpdateReviewer,
) -> Result<ReconcileReport> {
    ensure_unique_uuids(&current)?;

    let mut pulled_by_uuid = pulled
        .into_iter()
        .filter_map(|contact| Some((contact.icloud_uuid()?.to_string(), contact)))
        .collect::<HashMap<_, _>>();

    let mut report = ReconcileReport::default();
    let mut contacts = Vec::with_capacity(current.len());

    for local in current {
        let Some(mut remote) = local
            .icloud_uuid()
            .and_then(|uuid| pulled_by_uuid.remove(uuid))
        else {
            contacts.push(local);
            continue;
        };

        remote.id.clone_from(&local.id);
        remote.mtime = local.mtime;

        let Some(change) = diff_snapshots(&local, &remote)? else {
            report.unchanged += 1;
            contacts.push(local);
            continue;
        };

        if change.only_touches(&ETAG_PATH) {
            tracing::debug!("Accepting etag-only change for {}", local.display_name());
            report.etag_only += 1;
            contacts.push(remote);
        } else if reviewer.review(&local, &change)? {
            tracing::info!(
                "Accepted remote update for {} ({})",
                local.display_name(),
                change.changed_paths().join(", ")
            );
            remote.mtime = Some(Utc::now());
            report.accepted += 1;
            contacts.push(remote);
        } else {
            tracing::info!("Declined remote update for {}", local.display_name());
            report.declined += 1;
            contacts.push(local);
        }
    }

    report.unmatched_remote = pulled_by_uuid.len();
    if report.unmatched_remote > 0 {
        tracing::info!(
            "{} remote contacts have no local counterpart",
            report.unmatched_remote
        );
    }
    report.contacts = contacts;
    Ok(report)
}

fn ensure_unique_uuids(contacts: &[Contact]) -> Result<()> {
    let mut seen = HashSet::new();
    for uuid in contacts.iter().filter_map(Contact::icloud_uuid) {
        if !seen.insert(uuid) {
            return Err(Error::Validation(format!(
                "duplicate iCloud UUID in local store: {uuid}"
            )));
        }
    }
    Ok(())
}
