//! iCloud contacts web service: wire model, notes codec, session tokens,
//! HTTP client and fetch cache.

pub mod cache;
pub mod client;
pub mod model;
pub mod notes;
pub mod token;

pub use cache::{fetch_and_cache, RemoteCache};
pub use client::{new_remote_id, ContactsService, ICloudContactsClient, ICloudSettings};
pub use model::{ICloudContact, ICloudGroup, RemoteSnapshot};
pub use notes::Notes;
pub use token::SyncSession;
