//! Abstract collaborator contracts.
//!
//! All operations are plain async calls returning a value or a
//! [`LookupError`]. The catalog operations are idempotent reads, so callers
//! are free to issue them repeatedly and ignore results they no longer need.

use release_radar_core::{
    BacklogAddRequest, BacklogEntry, BacklogStatus, BacklogUpdateRequest, CatalogId, DetailResult, Entry, EntryId, EntryPayload,
    SearchResult,
};

use crate::error::LookupError;

/// Third-party game catalog: fuzzy title search and detail-by-id.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Search the catalog by title. May return an empty list.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError>;

    /// Fetch the full record for one catalog id. Fails with
    /// [`LookupError::NotFound`] when the id is unknown.
    async fn detail(&self, id: CatalogId) -> Result<DetailResult, LookupError>;
}

/// Persistence for tracked entries.
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    async fn create_entry(&self, payload: &EntryPayload) -> Result<Entry, LookupError>;

    async fn update_entry(&self, id: &EntryId, payload: &EntryPayload)
    -> Result<Entry, LookupError>;

    async fn get_entry(&self, id: &EntryId) -> Result<Entry, LookupError>;
}

/// Persistence for the personal backlog.
#[allow(async_fn_in_trait)]
pub trait BacklogStore {
    async fn add_to_backlog(&self, request: &BacklogAddRequest)
    -> Result<BacklogEntry, LookupError>;

    /// Backlog entries, optionally only those with `status`.
    async fn list_backlog(
        &self,
        status: Option<BacklogStatus>,
    ) -> Result<Vec<BacklogEntry>, LookupError>;

    /// Replace status, score, rating and notes of one entry. A `None` status
    /// keeps the stored one; every other `None` clears the field.
    async fn update_backlog(
        &self,
        id: &str,
        request: &BacklogUpdateRequest,
    ) -> Result<BacklogEntry, LookupError>;

    async fn remove_backlog(&self, id: &str) -> Result<(), LookupError>;
}
