//! Data models for rolo

mod contact;
mod date;
mod enumeration;
mod group;

pub use contact::{
    all_tags, Contact, EmailAddress, Education, FacebookProfile, Favorites, GameCenterProfile,
    HighSchool, ICloudMetadata, InstagramProfile, Name, PhoneNumber, Photo, PhotoCrop, School,
    SocialProfiles, StreetAddress, University,
};
pub use date::{remote_format, Date, DateRange, NO_YEAR};
pub use enumeration::{Country, CountryCode, HighSchoolName, UniversityName};
pub use group::{Group, GroupMetadata};
