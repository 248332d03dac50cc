//! Structured document stored in a remote contact's `notes` field.
//!
//! The document is YAML and omits absent fields.

use serde::{Deserialize, Serialize};

use crate::models::{DateRange, Favorites};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Notes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<NotesEducation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorites>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friends_friend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<DateRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotesEducation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bachelor: Option<NotesSchool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_school: Option<NotesSchool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<NotesSchool>,
}

/// School entry with majors/minors flattened to `", "`-joined strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotesSchool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grad_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub majors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minors: Option<String>,
}

impl Notes {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Serialize the document to YAML.
pub fn encode(notes: &Notes) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(notes)
}

/// Parse a YAML document. Blank text decodes to an empty document.
pub fn decode(text: &str) -> Result<Notes, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Notes::default());
    }
    serde_yaml::from_str(text)
}
