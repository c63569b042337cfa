//! Assisted-entry coordinator for the release tracker.
//!
//! The pieces, leaf to root:
//!
//! - [`debounce`]: turns keystroke bursts into one trailing search trigger.
//! - [`suppress`]: tells user title edits apart from the coordinator's own.
//! - [`session`]: the outstanding catalog search and its request tokens.
//! - [`prefill`]: merges a selected candidate's detail into the draft.
//! - [`draft`]: field values, validation and normalization.
//!
//! [`EntryForm`] wires them together around one draft; [`BacklogForm`] reuses
//! the search half for the backlog add flow.

pub mod async_util;
pub mod backlog;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod form;
pub mod prefill;
pub mod session;
pub mod settings;
pub mod suppress;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use backlog::{
    BacklogEdit, BacklogEditError, BacklogForm, BacklogInvalid, BacklogSubmitError, BacklogUpdate,
    edit_backlog,
};
pub use debounce::{DebounceGate, GateSignal};
pub use draft::{Draft, DraftField, ReleaseInput, ValidationErrors, normalize, validate};
pub use error::{SubmitError, SettingsError};
pub use form::{EntryForm, FormMode, FormPhase, FormUpdate, TextChange};
pub use prefill::{PrefillMerger, PrefillState};
pub use session::{RequestToken, SearchSession, SessionState};
pub use settings::{LoadedSettings, LookupSourceKind, SettingSource, Settings};
pub use suppress::QuerySuppressor;
