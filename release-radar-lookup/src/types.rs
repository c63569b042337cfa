use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use release_radar_core::{CatalogId, DetailResult, Platform, SearchResult};

use crate::systems::platform_from_igdb;

/// One game object from the IGDB `/games` endpoint. Which fields are
/// populated depends on the `fields` clause of the query.
#[derive(Debug, Deserialize, Clone)]
pub struct IgdbGame {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default)]
    pub cover: Option<IgdbCover>,
    #[serde(default)]
    pub platforms: Vec<IgdbPlatform>,
    #[serde(default)]
    pub involved_companies: Vec<IgdbInvolvedCompany>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<u32>,
    #[serde(default)]
    pub aggregated_rating: Option<f64>,
}

impl IgdbGame {
    /// First release date as a calendar date (IGDB stores epoch seconds, UTC).
    pub fn first_release_date(&self) -> Option<NaiveDate> {
        self.first_release_date
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive())
    }

    /// Absolute cover URL at `cover_big` size.
    ///
    /// IGDB hands out protocol-relative thumbnail URLs (`//images.igdb.com/.../t_thumb/...`).
    pub fn cover_url(&self) -> Option<String> {
        let url = self.cover.as_ref()?.url.as_deref()?;
        let sized = url.replace("t_thumb", "t_cover_big");
        if sized.starts_with("//") {
            Some(format!("https:{}", sized))
        } else {
            Some(sized)
        }
    }

    /// Critic score rounded to a whole number, clamped to 0-100.
    pub fn score(&self) -> Option<u8> {
        self.aggregated_rating
            .filter(|r| r.is_finite())
            .map(|r| r.round().clamp(0.0, 100.0) as u8)
    }

    /// Tracked platforms, deduplicated. Untracked IGDB platforms are dropped.
    pub fn tracked_platforms(&self) -> BTreeSet<Platform> {
        self.platforms
            .iter()
            .filter_map(|p| platform_from_igdb(p.id))
            .collect()
    }

    /// Name of the first involved company credited as developer.
    pub fn developer(&self) -> Option<String> {
        self.first_company(|c| c.developer)
    }

    /// Name of the first involved company credited as publisher.
    pub fn publisher(&self) -> Option<String> {
        self.first_company(|c| c.publisher)
    }

    fn first_company(&self, role: impl Fn(&IgdbInvolvedCompany) -> bool) -> Option<String> {
        self.involved_companies
            .iter()
            .filter(|c| role(c))
            .find_map(|c| c.company.as_ref().and_then(|co| co.name.clone()))
    }

    pub fn to_search_result(&self) -> SearchResult {
        SearchResult {
            catalog_id: CatalogId(self.id),
            title: self.name.clone().unwrap_or_default(),
            release_date: self.first_release_date(),
            image_url: self.cover_url(),
            platforms: self.tracked_platforms(),
            igdb_score: self.score(),
        }
    }

    pub fn to_detail(&self) -> DetailResult {
        DetailResult {
            title: self.name.clone().filter(|n| !n.trim().is_empty()),
            release_date: self.first_release_date(),
            image_url: self.cover_url(),
            platforms: self.tracked_platforms(),
            description: self.summary.clone().filter(|s| !s.trim().is_empty()),
            developer: self.developer(),
            publisher: self.publisher(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IgdbCover {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IgdbPlatform {
    pub id: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IgdbInvolvedCompany {
    #[serde(default)]
    pub company: Option<IgdbCompany>,
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IgdbCompany {
    #[serde(default)]
    pub name: Option<String>,
}

/// Twitch client-credentials token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
