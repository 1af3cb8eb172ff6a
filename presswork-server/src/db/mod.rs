//! Repository functions over the document tables
//!
//! All mutation is expressed as targeted field-level statements (counter
//! increments, single-row upserts/deletes) scoped to one row, never
//! read-modify-write of whole documents.

pub mod blogs;
pub mod careers;
pub mod comments;
pub mod contacts;
pub mod subscribers;

use chrono::{DateTime, Utc};
use presswork_common::{Error, Result};

/// Timestamps are stored as RFC 3339 text
pub(crate) fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .map_err(|e| Error::Internal(format!("Malformed stored timestamp {:?}: {}", s, e)))
}
