//! Records produced by the external game catalog.
//!
//! Both record types are immutable snapshots of what the catalog returned;
//! search results keep the catalog's ordering.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Opaque identifier of a game in the external catalog (an IGDB id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub u64);

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CatalogId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CatalogId)
    }
}

/// One candidate returned by a fuzzy title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "igdbId")]
    pub catalog_id: CatalogId,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    /// Critic score (0-100), when the catalog has one.
    #[serde(rename = "igdbScore", default)]
    pub igdb_score: Option<u8>,
}

/// Full detail record for exactly one catalog id.
///
/// Every field except the platform set may be absent; an empty platform set
/// is treated as absent when merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl SearchResult {
    /// Release year for compact display, if the catalog knows the date.
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_reads_backend_shape() {
        let json = r#"{
            "igdbId": 119133,
            "title": "Elden Ring",
            "releaseDate": "2022-02-25",
            "imageUrl": null,
            "platforms": ["PC", "PS5", "XBOX", "PC"]
        }"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.catalog_id, CatalogId(119133));
        assert_eq!(result.release_year(), Some(2022));
        assert_eq!(result.platforms.len(), 3);
        assert!(result.image_url.is_none());
        assert!(result.igdb_score.is_none());
    }

    #[test]
    fn detail_tolerates_missing_fields() {
        let detail: DetailResult = serde_json::from_str(r#"{"title": "Hades II"}"#).unwrap();
        assert_eq!(detail.title.as_deref(), Some("Hades II"));
        assert!(detail.release_date.is_none());
        assert!(detail.platforms.is_empty());
        assert!(detail.developer.is_none());
    }
}
