//! Conversions between the local contact model and the remote wire shape.

mod from_icloud;
mod to_icloud;

pub use from_icloud::icloud_contact_to_contact;
pub use to_icloud::contact_to_icloud_contact;

const TAG_SEPARATOR: &str = ", ";

const FACEBOOK_LABEL: &str = "FACEBOOK";
const GAME_CENTER_LABEL: &str = "GAMECENTER";
const INSTAGRAM_LABEL: &str = "INSTAGRAM";
const INSTAGRAM_DOMAIN_LABEL: &str = "instagram.com";

const FACEBOOK_URL_PREFIX: &str = "http://www.facebook.com";
const INSTAGRAM_URL_PREFIX: &str = "http://www.instagram.com";
