//! Tracked game entries as exchanged with the persistence backend.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::record::CatalogId;
use crate::release::ReleaseTime;

/// Identifier assigned to an entry by the backend (a UUID string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

/// Lifecycle status the backend derives for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Upcoming,
    Released,
    Cancelled,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Released => write!(f, "released"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Normalized create/update payload.
///
/// Strings are trimmed, empty optionals are absent, and a TBA entry carries
/// the sentinel date of its year alongside `tba = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub release_date: NaiveDate,
    pub platforms: BTreeSet<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(rename = "igdbId", skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<CatalogId>,
    pub tba: bool,
}

impl EntryPayload {
    pub fn release(&self) -> ReleaseTime {
        ReleaseTime::from_stored(self.release_date, self.tba)
    }
}

/// A persisted entry as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    pub status: EntryStatus,
    #[serde(default)]
    pub shop_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(rename = "igdbId", default)]
    pub catalog_id: Option<CatalogId>,
    #[serde(default)]
    pub tba: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Entry {
    pub fn release(&self) -> ReleaseTime {
        ReleaseTime::from_stored(self.release_date, self.tba)
    }
}
