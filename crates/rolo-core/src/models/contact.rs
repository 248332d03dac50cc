//! Contact model

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::date::{Date, DateRange};
use super::enumeration::{Country, CountryCode, HighSchoolName, UniversityName};
use crate::error::{Error, Result};

/// A person in the local contact book.
///
/// Every optional field is omitted from the stored JSON when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Locally assigned identifier (also the vault file name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorites>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_addresses: Option<Vec<StreetAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_profiles: Option<SocialProfiles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
    /// Link to the remote contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icloud: Option<ICloudMetadata>,
    /// Partner date range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dated: Option<DateRange>,
    /// Mutual friend through whom this contact is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friends_friend: Option<String>,
    /// Last local modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Favorites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub local_part: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EmailAddress {
    /// Split `user@example.com` at its last `@`.
    pub fn parse(address: &str, label: Option<String>) -> Result<Self> {
        let (local_part, domain) = address
            .trim()
            .rsplit_once('@')
            .filter(|(local_part, domain)| !local_part.is_empty() && !domain.is_empty())
            .ok_or_else(|| Error::Validation(format!("Invalid email address: {address}")))?;
        Ok(Self {
            local_part: local_part.to_string(),
            domain: domain.to_string(),
            label,
        })
    }

    pub fn address(&self) -> String {
        format!("{}@{}", self.local_part, self.domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub country_code: CountryCode,
    /// National number, digits only
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PhoneNumber {
    /// `+{dialing code}{number}`
    pub fn international(&self) -> String {
        format!("+{}{}", self.country_code.dialing_code(), self.number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<InstagramProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_center: Option<GameCenterProfile>,
}

impl SocialProfiles {
    pub const fn is_empty(&self) -> bool {
        self.facebook.is_none() && self.instagram.is_none() && self.game_center.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramProfile {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCenterProfile {
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// One school attended, named from a controlled vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School<N> {
    pub name: N,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub majors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minors: Option<Vec<String>>,
}

impl<N> School<N> {
    pub const fn new(name: N) -> Self {
        Self {
            name,
            graduation_year: None,
            majors: None,
            minors: None,
        }
    }
}

pub type HighSchool = School<HighSchoolName>;
pub type University = School<UniversityName>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_school: Option<HighSchool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bachelor: Option<University>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<University>,
}

impl Education {
    pub const fn is_empty(&self) -> bool {
        self.high_school.is_none() && self.bachelor.is_none() && self.master.is_none()
    }
}

/// Image attached to a remote contact; carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub crop: PhotoCrop,
    pub signature: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCrop {
    pub height: i64,
    pub width: i64,
    pub x: i64,
    pub y: i64,
}

/// Linkage between a local contact and its remote counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ICloudMetadata {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

impl Contact {
    /// Remote UUID, when the contact is linked.
    pub fn icloud_uuid(&self) -> Option<&str> {
        self.icloud.as_ref().map(|icloud| icloud.uuid.as_str())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|candidate| candidate == tag))
    }

    pub fn has_phone_number(&self) -> bool {
        self.phone_numbers
            .as_ref()
            .is_some_and(|numbers| !numbers.is_empty())
    }

    /// First and last name joined by a space.
    pub fn display_name(&self) -> String {
        [
            self.name.first_name.as_deref(),
            self.name.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Add an email address unless one with the same address already exists.
    ///
    /// Returns `true` when the address was added.
    pub fn add_email_address_if_not_exists(
        &mut self,
        address: &str,
        label: Option<String>,
    ) -> Result<bool> {
        if address.matches('@').count() != 1 {
            return Err(Error::InvalidInput(format!(
                "email address must contain exactly one '@': {address}"
            )));
        }
        let email = EmailAddress::parse(address, label)?;
        let emails = self.email_addresses.get_or_insert_with(Vec::new);
        if emails.iter().any(|existing| existing.address() == email.address()) {
            return Ok(false);
        }
        emails.push(email);
        Ok(true)
    }

    /// Add a phone number unless the same code + number already exists.
    ///
    /// Returns `true` when the number was added.
    pub fn add_phone_number_if_not_exists(
        &mut self,
        country_code: CountryCode,
        number: &str,
        label: Option<String>,
    ) -> Result<bool> {
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "phone number must contain digits only: {number}"
            )));
        }
        let numbers = self.phone_numbers.get_or_insert_with(Vec::new);
        if numbers
            .iter()
            .any(|existing| existing.country_code == country_code && existing.number == number)
        {
            return Ok(false);
        }
        numbers.push(PhoneNumber {
            country_code,
            number: number.to_string(),
            label,
        });
        Ok(true)
    }
}

/// Every tag used across `contacts`, sorted and deduplicated.
pub fn all_tags(contacts: &[Contact]) -> Vec<String> {
    contacts
        .iter()
        .flat_map(|contact| contact.tags.iter().flatten())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
