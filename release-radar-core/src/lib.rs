//! Shared data model for the release tracker.
//!
//! Platform tags, catalog identifiers, the search/detail records produced by
//! the game catalog, the normalized entry payload handed to persistence, and
//! the backlog types. No I/O lives here.

pub mod backlog;
pub mod entry;
pub mod platform;
pub mod record;
pub mod release;

pub use backlog::{
    BacklogAddRequest, BacklogEntry, BacklogStatus, BacklogStatusParseError, BacklogUpdateRequest,
};
pub use entry::{Entry, EntryId, EntryPayload, EntryStatus};
pub use platform::{Platform, PlatformParseError};
pub use record::{CatalogId, DetailResult, SearchResult};
pub use release::{ReleaseTime, TBA_MONTH, TBA_DAY};
