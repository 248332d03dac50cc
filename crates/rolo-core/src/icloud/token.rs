//! Sync token and etag bookkeeping for one remote session.
//!
//! The contacts service issues a new sync token (`...S=<n>`) after every call
//! and rejects writes whose etag counter (`C=<n>...`) is ahead of the token
//! the client sends. A `SyncSession` tracks the running token and rewrites
//! etags before updates. One session per sync run; never share it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

const SYNC_TOKEN_MARKER: &str = "S=";

static ETAG_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^C=(\d+)").expect("Invalid regex"));
static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("Invalid regex"));

#[derive(Clone, PartialEq, Eq)]
pub struct SyncSession {
    pref_token: String,
    sync_token_prefix: String,
    sync_token_number: i64,
}

impl Default for SyncSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyncSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SyncSession")
            .field("pref_token", &"[REDACTED]")
            .field("sync_token", &self.sync_token())
            .finish()
    }
}

impl SyncSession {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pref_token: String::new(),
            sync_token_prefix: String::new(),
            sync_token_number: -1,
        }
    }

    pub fn pref_token(&self) -> &str {
        &self.pref_token
    }

    pub fn set_pref_token(&mut self, pref_token: impl Into<String>) {
        self.pref_token = pref_token.into();
    }

    pub const fn sync_token_number(&self) -> i64 {
        self.sync_token_number
    }

    /// Prefix and counter concatenated, as sent back to the service.
    pub fn sync_token(&self) -> String {
        format!("{}{}", self.sync_token_prefix, self.sync_token_number)
    }

    /// Adopt the sync token returned by the latest call.
    ///
    /// The prefix runs up to and including the last `S=`; the counter is the
    /// trailing digit run.
    pub fn update_sync_token(&mut self, sync_token: &str) -> Result<()> {
        let marker_end = sync_token
            .rfind(SYNC_TOKEN_MARKER)
            .map(|index| index + SYNC_TOKEN_MARKER.len())
            .ok_or_else(|| {
                Error::Validation(format!("sync token has no '{SYNC_TOKEN_MARKER}' marker: {sync_token}"))
            })?;
        let number = TRAILING_DIGITS
            .captures(sync_token)
            .and_then(|captures| captures[1].parse::<i64>().ok())
            .ok_or_else(|| {
                Error::Validation(format!("sync token has no trailing counter: {sync_token}"))
            })?;

        self.sync_token_prefix = sync_token[..marker_end].to_string();
        self.sync_token_number = number;
        tracing::debug!("Sync token advanced to {}", self.sync_token());
        Ok(())
    }

    /// Rewrite an etag whose counter is at or ahead of the session counter.
    pub fn clamp_etag(&self, etag: &str) -> Result<String> {
        let captures = ETAG_COUNTER
            .captures(etag)
            .ok_or_else(|| Error::Validation(format!("etag has no 'C=' counter: {etag}")))?;
        let counter = captures[1]
            .parse::<i64>()
            .map_err(|_| Error::Validation(format!("etag counter out of range: {etag}")))?;

        if counter >= self.sync_token_number {
            let rest = &etag[captures[0].len()..];
            Ok(format!("C={}{rest}", self.sync_token_number))
        } else {
            Ok(etag.to_string())
        }
    }

    /// Clamp an optional etag in place. Objects without an etag are left alone.
    pub fn clamp_etag_in_place(&self, etag: &mut Option<String>) -> Result<()> {
        if let Some(current) = etag.as_deref() {
            *etag = Some(self.clamp_etag(current)?);
        }
        Ok(())
    }
}
