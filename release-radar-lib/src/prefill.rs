//! Prefill merger: resolves a selected search result into draft fields.
//!
//! Resolution is a short protocol:
//!
//! 1. [`PrefillMerger::resolve`] closes the dropdown, records the catalog id
//!    in the draft and moves to `Fetching`.
//! 2. The owner issues the detail fetch tagged with the returned
//!    [`PrefillToken`].
//! 3. [`PrefillMerger::apply`] merges the detail record (or the fallback
//!    subset from the search result) if the token is still live.
//!
//! Each resolution mints a new token that also carries the catalog id, so a
//! late detail response for an earlier selection, even of the same game,
//! can never be merged after a newer selection has begun.

use release_radar_core::{CatalogId, DetailResult, SearchResult};
use release_radar_lookup::LookupError;

use crate::draft::{Draft, ReleaseInput, format_date};
use crate::session::SearchSession;
use crate::suppress::QuerySuppressor;

/// Visible prefill progress. Only drives the loading/confirmation badge;
/// validation never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefillState {
    #[default]
    NotStarted,
    Fetching(CatalogId),
    Succeeded(CatalogId),
    FailedFallback(CatalogId),
}

/// Liveness marker for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefillToken {
    seq: u64,
    catalog_id: CatalogId,
}

impl PrefillToken {
    pub fn catalog_id(&self) -> CatalogId {
        self.catalog_id
    }
}

/// Result of offering a detail response to the merger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefillApplied {
    /// Detail record merged. `rewritten_title` is set when the title changed.
    Merged {
        catalog_id: CatalogId,
        rewritten_title: Option<String>,
    },
    /// Detail fetch failed; the search result's fields were merged instead.
    FellBack {
        catalog_id: CatalogId,
        rewritten_title: Option<String>,
    },
    /// The response belongs to a superseded or cancelled resolution.
    Stale,
}

struct LiveResolution {
    token: PrefillToken,
    selected: SearchResult,
}

#[derive(Default)]
pub struct PrefillMerger {
    state: PrefillState,
    seq: u64,
    live: Option<LiveResolution>,
}

impl PrefillMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PrefillState {
        self.state
    }

    /// Begin resolving `selected`: close the dropdown, record the catalog id
    /// optimistically and supersede any earlier resolution.
    pub fn resolve(
        &mut self,
        selected: SearchResult,
        session: &mut SearchSession,
        draft: &mut Draft,
    ) -> PrefillToken {
        session.close();

        self.seq += 1;
        let token = PrefillToken {
            seq: self.seq,
            catalog_id: selected.catalog_id,
        };
        if let Some(prev) = &self.live {
            log::debug!(
                "prefill for {} superseded by {}",
                prev.token.catalog_id,
                token.catalog_id
            );
        }

        draft.catalog_id = Some(selected.catalog_id);
        self.state = PrefillState::Fetching(selected.catalog_id);
        self.live = Some(LiveResolution { token, selected });
        token
    }

    /// Offer a detail response. Merges only if `token` is the live resolution.
    pub fn apply(
        &mut self,
        token: PrefillToken,
        outcome: Result<DetailResult, LookupError>,
        draft: &mut Draft,
        suppressor: &mut QuerySuppressor,
    ) -> PrefillApplied {
        let live = match self.live.take() {
            Some(live) if live.token == token => live,
            other => {
                self.live = other;
                log::debug!("discarding stale detail for {}", token.catalog_id);
                return PrefillApplied::Stale;
            }
        };

        let catalog_id = token.catalog_id;
        match outcome {
            Ok(detail) => {
                let rewritten_title = merge_detail(draft, suppressor, &live.selected, &detail);
                self.state = PrefillState::Succeeded(catalog_id);
                log::debug!("prefilled draft from detail of {}", catalog_id);
                PrefillApplied::Merged {
                    catalog_id,
                    rewritten_title,
                }
            }
            Err(e) => {
                log::debug!("detail fetch for {} failed ({}); using search result", catalog_id, e);
                let rewritten_title = merge_fallback(draft, suppressor, &live.selected);
                self.state = PrefillState::FailedFallback(catalog_id);
                PrefillApplied::FellBack {
                    catalog_id,
                    rewritten_title,
                }
            }
        }
    }

    /// Drop the confirmation badge and any in-flight resolution. Used when
    /// the user edits the title after (or during) a prefill.
    pub fn invalidate(&mut self) {
        if self.live.take().is_some() {
            log::debug!("in-flight prefill invalidated");
        }
        self.state = PrefillState::NotStarted;
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.state, PrefillState::Fetching(_))
    }
}

/// Merge a detail record into the draft. Fields the record does not speak to
/// are left untouched. Returns the new title if it changed.
fn merge_detail(
    draft: &mut Draft,
    suppressor: &mut QuerySuppressor,
    selected: &SearchResult,
    detail: &DetailResult,
) -> Option<String> {
    let title = detail.title.as_deref().unwrap_or(&selected.title);
    let rewritten = write_title(draft, suppressor, title);

    match detail.release_date {
        Some(date) => draft.release = ReleaseInput::Date(format_date(date)),
        None => {
            let year = match &draft.release {
                ReleaseInput::Tba { year } => year.clone(),
                ReleaseInput::Date(_) => String::new(),
            };
            draft.release = ReleaseInput::Tba { year };
        }
    }

    if !detail.platforms.is_empty() {
        draft.platforms = detail.platforms.clone();
    }
    if let Some(description) = &detail.description {
        draft.description = description.clone();
    }
    if let Some(developer) = &detail.developer {
        draft.developer = developer.clone();
    }
    if let Some(publisher) = &detail.publisher {
        draft.publisher = publisher.clone();
    }
    if let Some(image_url) = &detail.image_url {
        draft.image_url = image_url.clone();
    }
    rewritten
}

/// Merge the subset of fields a search result carries: title, release date,
/// platforms, image. An absent release date leaves the draft's as is.
fn merge_fallback(
    draft: &mut Draft,
    suppressor: &mut QuerySuppressor,
    selected: &SearchResult,
) -> Option<String> {
    let rewritten = write_title(draft, suppressor, &selected.title);
    if let Some(date) = selected.release_date {
        draft.release = ReleaseInput::Date(format_date(date));
    }
    if !selected.platforms.is_empty() {
        draft.platforms = selected.platforms.clone();
    }
    if let Some(image_url) = &selected.image_url {
        draft.image_url = image_url.clone();
    }
    rewritten
}

/// Programmatic title write. Arms the suppressor first so the echo of this
/// write does not start a search. An unchanged title produces no echo, so
/// the suppressor is only armed when the value actually changes.
fn write_title(draft: &mut Draft, suppressor: &mut QuerySuppressor, title: &str) -> Option<String> {
    if draft.title() == title {
        return None;
    }
    suppressor.mark_programmatic();
    draft.set_title(title);
    Some(title.to_string())
}

#[cfg(test)]
#[path = "tests/prefill_tests.rs"]
mod tests;
