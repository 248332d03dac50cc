//! Remote `ICloudContact` → local `Contact`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::icloud::model::{
    ICloudContact, ICloudEmailAddress, ICloudPhone, ICloudProfile, ICloudStreetAddress,
};
use crate::icloud::notes::{self, Notes, NotesSchool};
use crate::models::{
    Contact, Country, CountryCode, EmailAddress, Education, FacebookProfile, Favorites,
    GameCenterProfile, HighSchoolName, ICloudMetadata, InstagramProfile, Name, PhoneNumber,
    School, SocialProfiles, StreetAddress, UniversityName,
};
use crate::util::{non_empty, split_joined, Populated};

use super::{
    FACEBOOK_LABEL, FACEBOOK_URL_PREFIX, GAME_CENTER_LABEL, INSTAGRAM_DOMAIN_LABEL,
    INSTAGRAM_LABEL, INSTAGRAM_URL_PREFIX,
};

static PHONE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s()-]").expect("Invalid regex"));
static INTERNATIONAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d+$").expect("Invalid regex"));
static NANP_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}").expect("Invalid regex"));

/// Convert a remote contact into the local model.
///
/// Fails on any populated field rolo has no local representation for, on
/// malformed emails, phone numbers or social profiles, and on notes that do
/// not parse as the structured notes document.
pub fn icloud_contact_to_contact(icloud_contact: &ICloudContact) -> Result<Contact> {
    reject_unsupported_fields(icloud_contact)?;

    let uuid = icloud_contact.contact_id.clone().ok_or_else(|| {
        Error::Validation(format!(
            "remote contact has no contactId: {}",
            icloud_contact.describe()
        ))
    })?;

    let mut contact = Contact {
        birthday: icloud_contact.birthday,
        icloud: Some(ICloudMetadata {
            uuid,
            etag: icloud_contact.etag.clone(),
            photo: icloud_contact.photo.clone(),
        }),
        name: Name {
            prefix: icloud_contact.prefix.clone(),
            first_name: icloud_contact.first_name.clone(),
            nickname: icloud_contact.nick_name.clone(),
            middle_name: icloud_contact.middle_name.clone(),
            last_name: icloud_contact.last_name.clone(),
            suffix: None,
            chinese_name: None,
        },
        ..Contact::default()
    };

    if let Some(company_name) = icloud_contact
        .company_name
        .as_deref()
        .filter(|value| !value.is_empty())
    {
        contact.tags = Some(split_joined(company_name));
    }

    if let Some(emails) = &icloud_contact.email_addresses {
        contact.email_addresses = non_empty(
            emails
                .iter()
                .map(transform_email)
                .collect::<Result<Vec<_>>>()?,
        );
    }

    if let Some(phones) = &icloud_contact.phones {
        contact.phone_numbers = non_empty(
            phones
                .iter()
                .map(transform_phone)
                .collect::<Result<Vec<_>>>()?,
        );
    }

    if let Some(profiles) = icloud_contact.profiles.as_ref().filter(|p| !p.is_empty()) {
        contact.social_profiles = Some(transform_social_profiles(profiles)?);
    }

    if let Some(addresses) = &icloud_contact.street_addresses {
        contact.street_addresses =
            non_empty(addresses.iter().map(transform_street_address).collect());
    }

    if let Some(text) = icloud_contact.notes.as_deref() {
        let notes = notes::decode(text).map_err(|source| Error::MalformedNotes {
            contact: icloud_contact.describe(),
            source,
        })?;
        apply_notes(&mut contact, notes);
    }

    Ok(contact)
}

fn reject_unsupported_fields(icloud_contact: &ICloudContact) -> Result<()> {
    let populated = [
        ("IMs", icloud_contact.ims.is_populated()),
        ("dates", icloud_contact.dates.is_populated()),
        ("department", icloud_contact.department.is_populated()),
        ("jobTitle", icloud_contact.job_title.is_populated()),
        (
            "phoneticCompanyName",
            icloud_contact.phonetic_company_name.is_populated(),
        ),
        (
            "phoneticFirstName",
            icloud_contact.phonetic_first_name.is_populated(),
        ),
        (
            "phoneticLastName",
            icloud_contact.phonetic_last_name.is_populated(),
        ),
        ("relatedNames", icloud_contact.related_names.is_populated()),
        ("suffix", icloud_contact.suffix.is_populated()),
        ("urls", icloud_contact.urls.is_populated()),
    ];

    match populated.into_iter().find(|(_, is_populated)| *is_populated) {
        Some((field, _)) => Err(Error::UnsupportedField {
            field,
            contact: icloud_contact.describe(),
        }),
        None => Ok(()),
    }
}

fn transform_email(email: &ICloudEmailAddress) -> Result<EmailAddress> {
    EmailAddress::parse(&email.field, email.label.clone())
}

fn transform_phone(phone: &ICloudPhone) -> Result<PhoneNumber> {
    let field = PHONE_PUNCTUATION.replace_all(&phone.field, "");

    if !INTERNATIONAL_NUMBER.is_match(&field) {
        if NANP_NUMBER.is_match(&field) {
            return Ok(PhoneNumber {
                country_code: CountryCode::Nanp,
                number: field.into_owned(),
                label: phone.label.clone(),
            });
        }
        return Err(Error::Validation(format!(
            "Invalid phone number format: {field}"
        )));
    }

    CountryCode::ALL
        .into_iter()
        .find_map(|country_code| {
            field
                .strip_prefix(&format!("+{}", country_code.dialing_code()))
                .map(|number| PhoneNumber {
                    country_code,
                    number: number.to_string(),
                    label: phone.label.clone(),
                })
        })
        .ok_or_else(|| Error::Validation(format!("Unsupported country code: {field}")))
}

fn transform_social_profiles(profiles: &[ICloudProfile]) -> Result<SocialProfiles> {
    let mut social_profiles = SocialProfiles::default();

    for profile in profiles {
        match profile.label.as_deref() {
            Some(FACEBOOK_LABEL) => {
                social_profiles.facebook = Some(FacebookProfile {
                    user_id: profile.user_id.clone(),
                    username: profile.user.clone(),
                });
            }
            Some(GAME_CENTER_LABEL) => {
                let username = profile.user.clone().ok_or_else(|| {
                    Error::Validation("Missing username for Game Center profile".to_string())
                })?;
                // Game Center entries also populate Instagram with the same handle.
                social_profiles.instagram = Some(InstagramProfile {
                    username: username.clone(),
                });
                social_profiles.game_center = Some(GameCenterProfile {
                    link: profile.field.clone().unwrap_or_default(),
                    username: Some(username),
                });
            }
            Some(INSTAGRAM_LABEL) => {
                let username = profile.user.clone().ok_or_else(|| {
                    Error::Validation("Missing username for Instagram profile".to_string())
                })?;
                social_profiles.instagram = Some(InstagramProfile { username });
            }
            Some(INSTAGRAM_DOMAIN_LABEL) => {
                let username = profile.field.clone().ok_or_else(|| {
                    Error::Validation("Missing username for Instagram profile".to_string())
                })?;
                social_profiles.instagram = Some(InstagramProfile { username });
            }
            label => {
                let field = profile.field.as_deref().unwrap_or_default();
                if field.starts_with(INSTAGRAM_URL_PREFIX) {
                    social_profiles.instagram = Some(InstagramProfile {
                        username: profile.user.clone().unwrap_or_default(),
                    });
                } else if field.starts_with(FACEBOOK_URL_PREFIX) {
                    social_profiles.facebook = Some(FacebookProfile {
                        user_id: profile.user_id.clone(),
                        username: profile.user.clone(),
                    });
                } else {
                    return Err(Error::Validation(format!(
                        "Unsupported social profile label: {}",
                        label.unwrap_or("<none>")
                    )));
                }
            }
        }
    }

    Ok(social_profiles)
}

fn transform_street_address(address: &ICloudStreetAddress) -> StreetAddress {
    let field = &address.field;
    let country = match field.country.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => Some(Country::from_name(name)),
        None => field.country_code.as_deref().and_then(Country::from_iso_code),
    };

    StreetAddress {
        street: field
            .street
            .as_deref()
            .map(|street| street.lines().map(str::to_string).collect()),
        city: field.city.clone(),
        state: field.state.clone(),
        postal_code: field.postal_code.clone(),
        country,
        label: address.label.clone(),
    }
}

fn apply_notes(contact: &mut Contact, notes: Notes) {
    contact.name.chinese_name = notes.chinese_name;
    contact.notes = notes.comment;
    contact.favorite = notes.favorite.filter(|favorite| favorite != &Favorites::default());
    contact.friends_friend = notes.friends_friend;
    contact.dated = notes.partner.filter(|range| !range.is_empty());

    if let Some(education) = notes.education {
        let education = Education {
            high_school: education
                .high_school
                .map(|school| restore_school(school, HighSchoolName::from_name)),
            bachelor: education
                .bachelor
                .map(|school| restore_school(school, UniversityName::from_name)),
            master: education
                .master
                .map(|school| restore_school(school, UniversityName::from_name)),
        };
        if !education.is_empty() {
            contact.education = Some(education);
        }
    }
}

fn restore_school<N>(school: NotesSchool, name: impl Fn(&str) -> N) -> School<N> {
    let split = |value: Option<String>| {
        value
            .filter(|value| !value.is_empty())
            .map(|value| split_joined(&value))
    };
    School {
        name: name(&school.name),
        graduation_year: school.grad_year,
        majors: split(school.majors),
        minors: split(school.minors),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn remote(contact_id: &str) -> ICloudContact {
        ICloudContact {
            contact_id: Some(contact_id.to_string()),
            etag: Some("C=3@U=x".into()),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..ICloudContact::default()
        }
    }

    fn phone(field: &str) -> ICloudPhone {
        ICloudPhone {
            field: field.to_string(),
            label: None,
        }
    }

    fn profile(label: &str, field: Option<&str>, user: Option<&str>) -> ICloudProfile {
        ICloudProfile {
            field: field.map(str::to_string),
            label: Some(label.to_string()),
            user: user.map(str::to_string),
            ..ICloudProfile::default()
        }
    }

    #[test]
    fn links_remote_contact() {
        let contact = icloud_contact_to_contact(&remote("UUID-1")).unwrap();
        let icloud = contact.icloud.unwrap();
        assert_eq!(icloud.uuid, "UUID-1");
        assert_eq!(icloud.etag.as_deref(), Some("C=3@U=x"));
        assert_eq!(contact.name.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn requires_contact_id() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.contact_id = None;
        assert!(matches!(
            icloud_contact_to_contact(&icloud_contact),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn parses_international_phone_number() {
        let parsed = transform_phone(&phone("+3531234567")).unwrap();
        assert_eq!(parsed.country_code, CountryCode::Ireland);
        assert_eq!(parsed.number, "1234567");

        let parsed = transform_phone(&phone("+44 (20) 7946-0958")).unwrap();
        assert_eq!(parsed.country_code, CountryCode::UnitedKingdom);
        assert_eq!(parsed.number, "2079460958");
    }

    #[test]
    fn parses_bare_ten_digit_number_as_nanp() {
        let parsed = transform_phone(&phone("(617) 555-1234")).unwrap();
        assert_eq!(parsed.country_code, CountryCode::Nanp);
        assert_eq!(parsed.number, "6175551234");
    }

    #[test]
    fn rejects_unknown_country_code_and_bad_format() {
        let error = transform_phone(&phone("+9991234")).unwrap_err();
        assert!(error.to_string().contains("Unsupported country code"));

        let error = transform_phone(&phone("555-1234")).unwrap_err();
        assert!(error.to_string().contains("Invalid phone number format"));
    }

    #[test]
    fn rejects_populated_unsupported_field() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.job_title = Some("Engineer".into());
        match icloud_contact_to_contact(&icloud_contact) {
            Err(Error::UnsupportedField { field, contact }) => {
                assert_eq!(field, "jobTitle");
                assert!(contact.contains("UUID-1"));
            }
            other => panic!("expected unsupported field error, got {other:?}"),
        }
    }

    #[test]
    fn ignores_empty_unsupported_fields() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.job_title = Some(String::new());
        icloud_contact.urls = Some(Vec::new());
        assert!(icloud_contact_to_contact(&icloud_contact).is_ok());
    }

    #[test]
    fn rejects_suffix() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.suffix = Some("Jr.".into());
        assert!(matches!(
            icloud_contact_to_contact(&icloud_contact),
            Err(Error::UnsupportedField { field: "suffix", .. })
        ));
    }

    #[test]
    fn game_center_also_sets_instagram() {
        let profiles = transform_social_profiles(&[profile(
            "GAMECENTER",
            Some("gamecenter:/ada"),
            Some("ada.l"),
        )])
        .unwrap();
        assert_eq!(profiles.instagram.unwrap().username, "ada.l");
        assert_eq!(profiles.game_center.unwrap().link, "gamecenter:/ada");
    }

    #[test]
    fn social_profiles_require_usernames() {
        assert!(transform_social_profiles(&[profile("GAMECENTER", Some("x"), None)]).is_err());
        assert!(transform_social_profiles(&[profile("INSTAGRAM", Some("x"), None)]).is_err());
        assert!(transform_social_profiles(&[profile("instagram.com", None, None)]).is_err());
    }

    #[test]
    fn social_profile_fallbacks_use_url_prefix() {
        let profiles = transform_social_profiles(&[
            profile("instagram.com", Some("ada.l"), None),
            profile("OTHER", Some("http://www.facebook.com/ada"), Some("ada")),
        ])
        .unwrap();
        assert_eq!(profiles.instagram.unwrap().username, "ada.l");
        assert_eq!(profiles.facebook.unwrap().username.as_deref(), Some("ada"));

        let profiles = transform_social_profiles(&[profile(
            "x-custom",
            Some("http://www.instagram.com/ada"),
            None,
        )])
        .unwrap();
        assert_eq!(profiles.instagram.unwrap().username, "");

        let error =
            transform_social_profiles(&[profile("TWITTER", Some("https://x.com/ada"), None)])
                .unwrap_err();
        assert!(error.to_string().contains("Unsupported social profile label"));
    }

    #[test]
    fn street_address_falls_back_to_country_code() {
        let address = transform_street_address(&ICloudStreetAddress {
            field: crate::icloud::model::ICloudStreetAddressField {
                country_code: Some("IE".into()),
                street: Some("1 Main St\nApt 2".into()),
                ..Default::default()
            },
            label: None,
        });
        assert_eq!(address.country, Some(Country::Ireland));
        assert_eq!(
            address.street,
            Some(vec!["1 Main St".to_string(), "Apt 2".to_string()])
        );

        let address = transform_street_address(&ICloudStreetAddress {
            field: crate::icloud::model::ICloudStreetAddressField {
                country: Some("France".into()),
                country_code: Some("fr".into()),
                ..Default::default()
            },
            label: None,
        });
        assert_eq!(address.country, Some(Country::Unrecognized("France".into())));
    }

    #[test]
    fn malformed_notes_fail_the_contact() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.notes = Some("call back after the holidays".into());
        assert!(matches!(
            icloud_contact_to_contact(&icloud_contact),
            Err(Error::MalformedNotes { .. })
        ));
    }

    #[test]
    fn notes_splay_back_into_contact() {
        let mut icloud_contact = remote("UUID-1");
        icloud_contact.notes = Some(
            "comment: hi\neducation:\n  bachelor:\n    name: Some College\n    majors: Art, History\n"
                .into(),
        );
        let contact = icloud_contact_to_contact(&icloud_contact).unwrap();
        assert_eq!(contact.notes.as_deref(), Some("hi"));
        let bachelor = contact.education.unwrap().bachelor.unwrap();
        assert_eq!(
            bachelor.name,
            UniversityName::Unrecognized("Some College".into())
        );
        assert_eq!(
            bachelor.majors,
            Some(vec!["Art".to_string(), "History".to_string()])
        );
    }
}
