//! rolo-core - Core library for rolo
//!
//! Contact models, the iCloud wire model and client, the transformer between
//! them, pull reconciliation, group membership sync, the JSON contact store
//! and the vault exporter used by the `rolo` CLI.

pub mod diff;
pub mod error;
pub mod groups;
pub mod icloud;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod transform;
pub mod util;
pub mod vault;

pub use error::{Error, Result};
pub use models::{Contact, Group};
