//! Contact group model

use serde::{Deserialize, Serialize};

use crate::icloud::model::ICloudGroup;

/// A named set of contacts mirrored from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub icloud: GroupMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub contact_uuids: Vec<String>,
}

impl From<&ICloudGroup> for Group {
    fn from(group: &ICloudGroup) -> Self {
        Self {
            name: group.name.clone(),
            icloud: GroupMetadata {
                uuid: group.group_id.clone(),
                etag: group.etag.clone(),
                contact_uuids: group.contact_ids.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_from_remote_keeps_membership_order() {
        let remote = ICloudGroup {
            group_id: "G1".into(),
            name: "CTY".into(),
            contact_ids: vec!["B".into(), "A".into()],
            etag: Some("C=5/A=1".into()),
            ..ICloudGroup::default()
        };
        let group = Group::from(&remote);
        assert_eq!(group.name, "CTY");
        assert_eq!(group.icloud.uuid, "G1");
        assert_eq!(group.icloud.contact_uuids, vec!["B", "A"]);
        assert_eq!(group.icloud.etag.as_deref(), Some("C=5/A=1"));
    }
}
