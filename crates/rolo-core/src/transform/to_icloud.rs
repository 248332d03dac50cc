//! Local `Contact` → remote `ICloudContact`.

use crate::icloud::model::{
    ICloudContact, ICloudEmailAddress, ICloudPhone, ICloudProfile, ICloudStreetAddress,
    ICloudStreetAddressField,
};
use crate::icloud::notes::{self, Notes, NotesEducation, NotesSchool};
use crate::models::{
    Contact, EmailAddress, Education, Favorites, PhoneNumber, School, SocialProfiles,
    StreetAddress,
};
use crate::util::non_empty;

use super::{
    FACEBOOK_LABEL, FACEBOOK_URL_PREFIX, GAME_CENTER_LABEL, INSTAGRAM_LABEL, INSTAGRAM_URL_PREFIX,
    TAG_SEPARATOR,
};

/// Convert a local contact into its remote wire shape.
///
/// Pure: nothing is validated beyond what the local model already
/// guarantees. Fails only if the notes document cannot be serialized.
pub fn contact_to_icloud_contact(contact: &Contact) -> Result<ICloudContact, serde_yaml::Error> {
    let mut icloud_contact = ICloudContact {
        birthday: contact.birthday,
        prefix: contact.name.prefix.clone(),
        first_name: contact.name.first_name.clone(),
        middle_name: contact.name.middle_name.clone(),
        last_name: contact.name.last_name.clone(),
        nick_name: contact.name.nickname.clone(),
        suffix: contact.name.suffix.clone(),
        is_company: false,
        is_guardian_approved: false,
        whitelisted: false,
        ..ICloudContact::default()
    };

    if let Some(icloud) = &contact.icloud {
        icloud_contact.contact_id = Some(icloud.uuid.clone());
        icloud_contact.etag.clone_from(&icloud.etag);
        icloud_contact.photo.clone_from(&icloud.photo);
    }

    if let Some(tags) = contact.tags.as_ref().filter(|tags| !tags.is_empty()) {
        icloud_contact.company_name = Some(tags.join(TAG_SEPARATOR));
    }

    if let Some(emails) = &contact.email_addresses {
        icloud_contact.email_addresses = non_empty(emails.iter().map(transform_email).collect());
    }

    if let Some(phones) = &contact.phone_numbers {
        icloud_contact.phones = non_empty(phones.iter().map(transform_phone).collect());
    }

    if let Some(profiles) = &contact.social_profiles {
        icloud_contact.profiles = non_empty(transform_social_profiles(profiles));
    }

    if let Some(addresses) = &contact.street_addresses {
        icloud_contact.street_addresses =
            non_empty(addresses.iter().map(transform_street_address).collect());
    }

    if has_notes_content(contact) {
        icloud_contact.notes = Some(notes::encode(&extract_notes(contact))?);
    }

    Ok(icloud_contact)
}

fn transform_email(email: &EmailAddress) -> ICloudEmailAddress {
    ICloudEmailAddress {
        field: email.address(),
        label: email.label.clone(),
    }
}

fn transform_phone(phone: &PhoneNumber) -> ICloudPhone {
    ICloudPhone {
        field: phone.international(),
        label: phone.label.clone(),
    }
}

fn transform_social_profiles(profiles: &SocialProfiles) -> Vec<ICloudProfile> {
    let mut icloud_profiles = Vec::new();

    if let Some(facebook) = &profiles.facebook {
        icloud_profiles.push(ICloudProfile {
            field: Some(format!(
                "{FACEBOOK_URL_PREFIX}/{}",
                facebook.username.as_deref().unwrap_or_default()
            )),
            label: Some(FACEBOOK_LABEL.to_string()),
            user: facebook.username.clone(),
            user_id: facebook.user_id.clone(),
            ..ICloudProfile::default()
        });
    }

    if let Some(game_center) = &profiles.game_center {
        icloud_profiles.push(ICloudProfile {
            field: Some(game_center.link.clone()),
            label: Some(GAME_CENTER_LABEL.to_string()),
            user: game_center.username.clone(),
            ..ICloudProfile::default()
        });
    }

    if let Some(instagram) = &profiles.instagram {
        icloud_profiles.push(ICloudProfile {
            field: Some(format!("{INSTAGRAM_URL_PREFIX}/{}", instagram.username)),
            label: Some(INSTAGRAM_LABEL.to_string()),
            user: Some(instagram.username.clone()),
            ..ICloudProfile::default()
        });
    }

    icloud_profiles
}

fn transform_street_address(address: &StreetAddress) -> ICloudStreetAddress {
    ICloudStreetAddress {
        field: ICloudStreetAddressField {
            country: address.country.as_ref().map(|country| country.as_str().to_string()),
            country_code: address
                .country
                .as_ref()
                .and_then(|country| country.iso_code())
                .map(str::to_string),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            state: address.state.clone(),
            street: address.street.as_ref().map(|lines| lines.join("\n")),
            sub_locality: None,
        },
        label: address.label.clone(),
    }
}

/// Favorites alone do not trigger a notes document.
fn has_notes_content(contact: &Contact) -> bool {
    contact.dated.as_ref().is_some_and(|range| !range.is_empty())
        || contact.education.as_ref().is_some_and(|education| !education.is_empty())
        || contact.friends_friend.is_some()
        || contact.name.chinese_name.is_some()
        || contact.notes.is_some()
}

fn extract_notes(contact: &Contact) -> Notes {
    Notes {
        chinese_name: contact.name.chinese_name.clone(),
        comment: contact.notes.clone(),
        education: contact.education.as_ref().and_then(extract_education),
        favorite: contact
            .favorite
            .clone()
            .filter(|favorite| favorite != &Favorites::default()),
        friends_friend: contact.friends_friend.clone(),
        partner: contact.dated.clone().filter(|range| !range.is_empty()),
    }
}

fn extract_education(education: &Education) -> Option<NotesEducation> {
    if education.is_empty() {
        return None;
    }
    Some(NotesEducation {
        bachelor: education.bachelor.as_ref().map(extract_school),
        high_school: education.high_school.as_ref().map(extract_school),
        master: education.master.as_ref().map(extract_school),
    })
}

fn extract_school<N: ToString>(school: &School<N>) -> NotesSchool {
    let join = |values: &Option<Vec<String>>| {
        values
            .as_ref()
            .filter(|values| !values.is_empty())
            .map(|values| values.join(TAG_SEPARATOR))
    };
    NotesSchool {
        name: school.name.to_string(),
        grad_year: school.graduation_year,
        majors: join(&school.majors),
        minors: join(&school.minors),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{
        Country, CountryCode, Date, FacebookProfile, GameCenterProfile, ICloudMetadata,
        InstagramProfile, Name, UniversityName,
    };

    fn base_contact() -> Contact {
        Contact {
            name: Name {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                ..Name::default()
            },
            icloud: Some(ICloudMetadata {
                uuid: "UUID-1".into(),
                etag: Some("C=12@U=x".into()),
                photo: None,
            }),
            ..Contact::default()
        }
    }

    #[test]
    fn sets_fixed_flags_and_linkage() {
        let mut contact = base_contact();
        contact.birthday = Some(Date::new(None, 12, 10).unwrap());
        let remote = contact_to_icloud_contact(&contact).unwrap();

        assert_eq!(remote.contact_id.as_deref(), Some("UUID-1"));
        assert_eq!(remote.etag.as_deref(), Some("C=12@U=x"));
        assert!(!remote.is_company);
        assert!(!remote.is_guardian_approved);
        assert!(!remote.whitelisted);
        assert_eq!(remote.first_name.as_deref(), Some("Ada"));
        assert_eq!(remote.birthday, contact.birthday);
        assert_eq!(remote.notes, None);
    }

    #[test]
    fn joins_tags_into_company_name() {
        let mut contact = base_contact();
        contact.tags = Some(vec!["NU".into(), "CTY".into()]);
        let remote = contact_to_icloud_contact(&contact).unwrap();
        assert_eq!(remote.company_name.as_deref(), Some("NU, CTY"));
    }

    #[test]
    fn concatenates_emails_and_phones() {
        let mut contact = base_contact();
        contact.email_addresses = Some(vec![EmailAddress {
            local_part: "ada".into(),
            domain: "example.com".into(),
            label: Some("HOME".into()),
        }]);
        contact.phone_numbers = Some(vec![PhoneNumber {
            country_code: CountryCode::Ireland,
            number: "1234567".into(),
            label: Some("MOBILE".into()),
        }]);

        let remote = contact_to_icloud_contact(&contact).unwrap();
        assert_eq!(
            remote.email_addresses,
            Some(vec![ICloudEmailAddress {
                field: "ada@example.com".into(),
                label: Some("HOME".into()),
            }])
        );
        assert_eq!(
            remote.phones,
            Some(vec![ICloudPhone {
                field: "+3531234567".into(),
                label: Some("MOBILE".into()),
            }])
        );
    }

    #[test]
    fn synthesizes_social_profile_urls() {
        let mut contact = base_contact();
        contact.social_profiles = Some(SocialProfiles {
            facebook: Some(FacebookProfile {
                user_id: Some("1001".into()),
                username: None,
            }),
            instagram: Some(InstagramProfile {
                username: "ada.l".into(),
            }),
            game_center: Some(GameCenterProfile {
                link: "gamecenter:/ada".into(),
                username: Some("ada.l".into()),
            }),
        });

        let profiles = contact_to_icloud_contact(&contact).unwrap().profiles.unwrap();
        let labels = profiles
            .iter()
            .map(|profile| profile.label.as_deref().unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["FACEBOOK", "GAMECENTER", "INSTAGRAM"]);
        assert_eq!(profiles[0].field.as_deref(), Some("http://www.facebook.com/"));
        assert_eq!(profiles[0].user_id.as_deref(), Some("1001"));
        assert_eq!(profiles[1].field.as_deref(), Some("gamecenter:/ada"));
        assert_eq!(
            profiles[2].field.as_deref(),
            Some("http://www.instagram.com/ada.l")
        );
    }

    #[test]
    fn maps_street_address_country() {
        let mut contact = base_contact();
        contact.street_addresses = Some(vec![
            StreetAddress {
                street: Some(vec!["1 Main St".into(), "Apt 2".into()]),
                city: Some("Boston".into()),
                country: Some(Country::UnitedStates),
                ..StreetAddress::default()
            },
            StreetAddress {
                country: Some(Country::Unrecognized("France".into())),
                ..StreetAddress::default()
            },
        ]);

        let addresses = contact_to_icloud_contact(&contact)
            .unwrap()
            .street_addresses
            .unwrap();
        assert_eq!(addresses[0].field.street.as_deref(), Some("1 Main St\nApt 2"));
        assert_eq!(addresses[0].field.country.as_deref(), Some("United States"));
        assert_eq!(addresses[0].field.country_code.as_deref(), Some("us"));
        assert_eq!(addresses[1].field.country.as_deref(), Some("France"));
        assert_eq!(addresses[1].field.country_code, None);
    }

    #[test]
    fn encodes_notes_only_when_triggered() {
        let mut contact = base_contact();
        contact.favorite = Some(Favorites {
            candy: Some("Twix".into()),
            color: None,
        });
        assert_eq!(contact_to_icloud_contact(&contact).unwrap().notes, None);

        let mut bachelor = School::new(UniversityName::NortheasternUniversity);
        bachelor.graduation_year = Some(2019);
        bachelor.majors = Some(vec!["Computer Science".into(), "Math".into()]);
        contact.education = Some(Education {
            bachelor: Some(bachelor),
            ..Education::default()
        });

        let text = contact_to_icloud_contact(&contact).unwrap().notes.unwrap();
        let decoded = notes::decode(&text).unwrap();
        let school = decoded.education.unwrap().bachelor.unwrap();
        assert_eq!(school.name, "Northeastern University");
        assert_eq!(school.grad_year, Some(2019));
        assert_eq!(school.majors.as_deref(), Some("Computer Science, Math"));
        assert_eq!(decoded.favorite.unwrap().candy.as_deref(), Some("Twix"));
    }

    #[test]
    fn empty_favorites_are_not_encoded() {
        let mut contact = base_contact();
        contact.notes = Some("x".into());
        contact.favorite = Some(Favorites::default());

        let remote = contact_to_icloud_contact(&contact).unwrap();
        assert_eq!(remote.notes.as_deref(), Some("comment: x\n"));

        let decoded = crate::transform::icloud_contact_to_contact(&remote).unwrap();
        assert_eq!(decoded.favorite, None);
        assert_eq!(decoded.notes.as_deref(), Some("x"));
    }
}
