//! Draft state of one entry form: raw field values, validation, and
//! normalization into the payload handed to persistence.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use release_radar_core::{CatalogId, Entry, EntryPayload, Platform, ReleaseTime};

/// Accepted range for a TBA release year.
pub const MIN_TBA_YEAR: i32 = 2000;
pub const MAX_TBA_YEAR: i32 = 2099;

/// How the release time is being entered. Exactly one representation is
/// active; switching discards the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseInput {
    /// Exact date as typed (`YYYY-MM-DD`), possibly empty.
    Date(String),
    /// Date to be announced; only the year is tracked, as typed.
    Tba { year: String },
}

impl Default for ReleaseInput {
    fn default() -> Self {
        Self::Date(String::new())
    }
}

impl ReleaseInput {
    pub fn is_tba(&self) -> bool {
        matches!(self, Self::Tba { .. })
    }
}

/// Fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Title,
    ReleaseDate,
    Platforms,
    ShopUrl,
    ImageUrl,
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::ReleaseDate => "release date",
            Self::Platforms => "platforms",
            Self::ShopUrl => "shop URL",
            Self::ImageUrl => "image URL",
        };
        f.write_str(name)
    }
}

/// Per-field validation messages. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors(BTreeMap<DraftField, String>);

impl ValidationErrors {
    fn add(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn has(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn summary(&self) -> String {
        self.0
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// In-progress values of one entry form.
///
/// The title is only written through the form's change handler or the
/// prefill merger, so it has no public setter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    title: String,
    pub description: String,
    pub release: ReleaseInput,
    pub platforms: BTreeSet<Platform>,
    pub shop_url: String,
    pub image_url: String,
    pub developer: String,
    pub publisher: String,
    pub catalog_id: Option<CatalogId>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft from a persisted entry (edit mode).
    pub fn from_entry(entry: &Entry) -> Self {
        let release = match entry.release() {
            ReleaseTime::Date(d) => ReleaseInput::Date(format_date(d)),
            ReleaseTime::Tba { year } => ReleaseInput::Tba {
                year: year.to_string(),
            },
        };
        Self {
            title: entry.title.clone(),
            description: entry.description.clone().unwrap_or_default(),
            release,
            platforms: entry.platforms.clone(),
            shop_url: entry.shop_url.clone().unwrap_or_default(),
            image_url: entry.image_url.clone().unwrap_or_default(),
            developer: entry.developer.clone().unwrap_or_default(),
            publisher: entry.publisher.clone().unwrap_or_default(),
            catalog_id: entry.catalog_id,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release = ReleaseInput::Date(date.into());
        self
    }

    pub fn with_tba_year(mut self, year: impl Into<String>) -> Self {
        self.release = ReleaseInput::Tba { year: year.into() };
        self
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_developer(mut self, developer: impl Into<String>) -> Self {
        self.developer = developer.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_release_date(&mut self, date: impl Into<String>) {
        self.release = ReleaseInput::Date(date.into());
    }

    pub fn set_release_year(&mut self, year: impl Into<String>) {
        self.release = ReleaseInput::Tba { year: year.into() };
    }

    /// Switch between exact-date and TBA entry. Switching to TBA keeps the
    /// year of a valid exact date as a starting point.
    pub fn set_tba(&mut self, tba: bool) {
        match (&self.release, tba) {
            (ReleaseInput::Date(date), true) => {
                let year = parse_date(date)
                    .map(|d| d.year().to_string())
                    .unwrap_or_default();
                self.release = ReleaseInput::Tba { year };
            }
            (ReleaseInput::Tba { .. }, false) => {
                self.release = ReleaseInput::Date(String::new());
            }
            _ => {}
        }
    }

    pub fn toggle_platform(&mut self, platform: Platform) {
        if !self.platforms.remove(&platform) {
            self.platforms.insert(platform);
        }
    }
}

/// Check a draft. Pure: reports every failing field at once.
pub fn validate(draft: &Draft) -> Result<(), ValidationErrors> {
    resolve_release(draft).map(|_| ())
}

/// Validate and normalize a draft into the persistence payload.
///
/// Strings are trimmed, empty optionals collapse to `None`, and a TBA draft
/// is stored under the sentinel date December 31 of its year.
pub fn normalize(draft: &Draft) -> Result<EntryPayload, ValidationErrors> {
    let release = resolve_release(draft)?;
    let release_date = release.sentinel_date().ok_or_else(|| {
        let mut errors = ValidationErrors::default();
        errors.add(DraftField::ReleaseDate, "Release date is out of range");
        errors
    })?;

    Ok(EntryPayload {
        title: draft.title.trim().to_string(),
        description: non_empty(&draft.description),
        release_date,
        platforms: draft.platforms.clone(),
        shop_url: non_empty(&draft.shop_url),
        image_url: non_empty(&draft.image_url),
        developer: non_empty(&draft.developer),
        publisher: non_empty(&draft.publisher),
        catalog_id: draft.catalog_id,
        tba: release.is_tba(),
    })
}

/// Run every field check, returning the resolved release time when all pass.
fn resolve_release(draft: &Draft) -> Result<ReleaseTime, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if draft.title.trim().is_empty() {
        errors.add(DraftField::Title, "Title is required");
    }

    let release = match &draft.release {
        ReleaseInput::Tba { year } => match parse_tba_year(year) {
            Some(year) => Some(ReleaseTime::Tba { year }),
            None => {
                errors.add(
                    DraftField::ReleaseDate,
                    format!("Enter a year between {} and {}", MIN_TBA_YEAR, MAX_TBA_YEAR),
                );
                None
            }
        },
        ReleaseInput::Date(date) if date.trim().is_empty() => {
            errors.add(DraftField::ReleaseDate, "Release date is required");
            None
        }
        ReleaseInput::Date(date) => match parse_date(date) {
            Some(d) => Some(ReleaseTime::Date(d)),
            None => {
                errors.add(DraftField::ReleaseDate, "Release date must be YYYY-MM-DD");
                None
            }
        },
    };

    if draft.platforms.is_empty() {
        errors.add(DraftField::Platforms, "Select at least one platform");
    }
    if !is_http_url_or_empty(&draft.shop_url) {
        errors.add(DraftField::ShopUrl, "Shop URL must be a valid http/https URL");
    }
    if !is_http_url_or_empty(&draft.image_url) {
        errors.add(DraftField::ImageUrl, "Image URL must be a valid http/https URL");
    }

    match release {
        Some(release) if errors.is_empty() => Ok(release),
        _ => Err(errors),
    }
}

fn parse_tba_year(year: &str) -> Option<i32> {
    year.trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (MIN_TBA_YEAR..=MAX_TBA_YEAR).contains(y))
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Empty, or `http://` / `https://` followed by at least one character.
fn is_http_url_or_empty(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return true;
    }
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
