//! Collaborators consumed by the assisted-entry coordinator.
//!
//! The game catalog (fuzzy title search and detail-by-id) and the entry
//! persistence backend are modelled as async traits in [`source`]. Two HTTP
//! implementations are provided: [`TrackerClient`] talks to the tracker
//! backend, [`IgdbClient`] queries IGDB directly.

pub mod client;
pub mod error;
pub mod igdb;
pub mod source;
pub mod systems;
pub mod types;

pub use client::{DEFAULT_BACKEND_URL, TrackerClient};
pub use error::LookupError;
pub use igdb::{IgdbClient, IgdbCredentials};
pub use source::{BacklogStore, CatalogSource, EntryStore};
pub use systems::platform_from_igdb;
