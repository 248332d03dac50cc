//! Error types for rolo-core

use thiserror::Error;

/// Result type alias using rolo-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rolo-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A remote contact populates a field with no local representation
    #[error("Unsupported field '{field}' on remote contact {contact}")]
    UnsupportedField {
        field: &'static str,
        contact: String,
    },

    /// Malformed phone number, email, social profile, token, etc.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The YAML document embedded in a remote contact's notes is invalid
    #[error("Malformed notes on remote contact {contact}: {source}")]
    MalformedNotes {
        contact: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The remote service rejected a call or returned an unexpected payload
    #[error("Remote service error: {0}")]
    Remote(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The operation was interrupted before completion
    #[error("Aborted: {0}")]
    Aborted(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
