//! Rule-driven remote group membership.

use std::collections::HashMap;

use crate::error::Result;
use crate::icloud::{new_remote_id, ContactsService, ICloudGroup, SyncSession};
use crate::models::Contact;

/// Which contacts belong to a managed group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRule {
    HasTag(&'static str),
    HasPhoneNumber,
}

impl MembershipRule {
    pub fn matches(self, contact: &Contact) -> bool {
        match self {
            Self::HasTag(tag) => contact.has_tag(tag),
            Self::HasPhoneNumber => contact.has_phone_number(),
        }
    }
}

/// Managed groups in the order they are synced.
pub const GROUP_RULES: [(&str, MembershipRule); 7] = [
    ("CTY", MembershipRule::HasTag("CTY")),
    ("HubSpot", MembershipRule::HasTag("HubSpot")),
    ("Needham", MembershipRule::HasTag("Needham")),
    ("Northeastern", MembershipRule::HasTag("NU")),
    ("Phone Numbers", MembershipRule::HasPhoneNumber),
    ("PowerAdvocate", MembershipRule::HasTag("PowerAdvocate")),
    ("Sharks", MembershipRule::HasTag("Sharks")),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupAction {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSyncOutcome {
    pub name: String,
    pub action: GroupAction,
    pub members: usize,
}

/// Remote UUIDs of the linked contacts matching `rule`, in local order.
pub fn member_uuids(contacts: &[Contact], rule: MembershipRule) -> Vec<String> {
    contacts
        .iter()
        .filter(|contact| rule.matches(contact))
        .filter_map(|contact| contact.icloud_uuid().map(str::to_string))
        .collect()
}

/// Create or update every managed group so its membership matches the rules.
pub async fn sync_groups(
    service: &dyn ContactsService,
    session: &mut SyncSession,
    contacts: &[Contact],
    remote_groups: Vec<ICloudGroup>,
) -> Result<Vec<GroupSyncOutcome>> {
    let mut groups_by_name = remote_groups
        .into_iter()
        .map(|group| (group.name.clone(), group))
        .collect::<HashMap<_, _>>();

    let mut outcomes = Vec::with_capacity(GROUP_RULES.len());
    for (name, rule) in GROUP_RULES {
        let contact_ids = member_uuids(contacts, rule);
        let members = contact_ids.len();

        let action = match groups_by_name.remove(name) {
            Some(mut group) => {
                group.contact_ids = contact_ids;
                service.update_group(session, group).await?;
                tracing::info!("Updated group {name} with {members} members");
                GroupAction::Updated
            }
            None => {
                let group = ICloudGroup {
                    group_id: new_remote_id(),
                    name: name.to_string(),
                    contact_ids,
                    ..ICloudGroup::default()
                };
                service.create_group(session, group).await?;
                tracing::info!("Created group {name} with {members} members");
                GroupAction::Created
            }
        };

        outcomes.push(GroupSyncOutcome {
            name: name.to_string(),
            action,
            members,
        });
    }
    Ok(outcomes)
}
