//! Backlog: games the user intends to play, with progress status and rating.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::CatalogId;

/// Progress status of a backlog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BacklogStatus {
    #[default]
    WantToPlay,
    Playing,
    Completed,
    Dropped,
}

const ALL_STATUSES: &[BacklogStatus] = &[
    BacklogStatus::WantToPlay,
    BacklogStatus::Playing,
    BacklogStatus::Completed,
    BacklogStatus::Dropped,
];

impl BacklogStatus {
    pub fn all() -> &'static [BacklogStatus] {
        ALL_STATUSES
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WantToPlay => "Want to Play",
            Self::Playing => "Playing",
            Self::Completed => "Completed",
            Self::Dropped => "Dropped",
        }
    }

    /// Tag used on the wire and in `?status=` filters.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::WantToPlay => "WANT_TO_PLAY",
            Self::Playing => "PLAYING",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            Self::WantToPlay => "want",
            Self::Playing => "playing",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

impl std::fmt::Display for BacklogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown backlog status: '{0}'")]
pub struct BacklogStatusParseError(pub String);

impl std::str::FromStr for BacklogStatus {
    type Err = BacklogStatusParseError;

    /// Accepts the short name, the label, or the wire tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_STATUSES
            .iter()
            .copied()
            .find(|st| {
                st.short_name() == lower
                    || st.label().to_lowercase() == lower
                    || st.wire_tag().to_lowercase() == lower
            })
            .ok_or_else(|| BacklogStatusParseError(s.to_string()))
    }
}

/// Request body for adding a catalog game to the backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogAddRequest {
    #[serde(rename = "igdbId")]
    pub catalog_id: CatalogId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub backlog_status: BacklogStatus,
    /// Catalog critic score (0-100) at the time of adding.
    #[serde(rename = "igdbScore", skip_serializing_if = "Option::is_none")]
    pub igdb_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for changing a backlog entry.
///
/// The backend replaces score, rating and notes with exactly what is sent
/// (`null` clears them); a missing status keeps the current one. Start from
/// [`BacklogEntry::update_request`] to change one field only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backlog_status: Option<BacklogStatus>,
    #[serde(rename = "igdbScore")]
    pub igdb_score: Option<u8>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

/// A persisted backlog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogEntry {
    pub id: String,
    #[serde(rename = "igdbId")]
    pub catalog_id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    pub backlog_status: BacklogStatus,
    #[serde(rename = "igdbScore", default)]
    pub igdb_score: Option<u8>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl BacklogEntry {
    /// An update that keeps every current value.
    pub fn update_request(&self) -> BacklogUpdateRequest {
        BacklogUpdateRequest {
            backlog_status: Some(self.backlog_status),
            igdb_score: self.igdb_score,
            rating: self.rating,
            notes: self.notes.clone(),
        }
    }
}
