//! Backlog add flow: search the catalog, pick a game, set status, rating
//! and notes, then add it to the personal backlog.
//!
//! Searching follows the same debounce and request-token rules as the entry
//! form. Picking a result does not fetch detail; the search record carries
//! everything a backlog entry needs.
//!
//! [`edit_backlog`] tracks progress on an entry that is already there.

use std::rc::Rc;

use tokio::time::Instant;

use release_radar_core::{
    BacklogAddRequest, BacklogEntry, BacklogStatus, BacklogUpdateRequest, SearchResult,
};
use release_radar_lookup::{BacklogStore, CatalogSource, LookupError};

use crate::async_util::{Inflight, Wake, next_wake};
use crate::debounce::{DebounceGate, GateSignal};
use crate::form::{FormPhase, TextChange, issue_search};
use crate::session::{RequestToken, SearchApplied, SearchSession};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Generic message shown when the backlog store rejects an add.
pub const ADD_FAILED_MESSAGE: &str = "Failed to add game to backlog. Please try again.";

/// Why a backlog add cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BacklogInvalid {
    #[error("Select a game first")]
    NoSelection,

    #[error("Rating must be between 1 and 10")]
    Rating(u8),
}

fn check_rating(rating: Option<u8>) -> Result<(), BacklogInvalid> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(BacklogInvalid::Rating(r)),
        _ => Ok(()),
    }
}

fn clean_notes(notes: &str) -> Option<String> {
    let notes = notes.trim();
    (!notes.is_empty()).then(|| notes.to_string())
}

/// One change to an existing backlog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacklogEdit {
    Status(BacklogStatus),
    /// `None` clears the rating.
    Rating(Option<u8>),
    /// Blank text clears the notes.
    Notes(String),
}

impl BacklogEdit {
    pub fn validate(&self) -> Result<(), BacklogInvalid> {
        match self {
            Self::Rating(rating) => check_rating(*rating),
            _ => Ok(()),
        }
    }

    /// The update that applies this change to `entry` and keeps every other
    /// field as it is.
    pub fn request_for(&self, entry: &BacklogEntry) -> Result<BacklogUpdateRequest, BacklogInvalid> {
        self.validate()?;
        let mut request = entry.update_request();
        match self {
            Self::Status(status) => request.backlog_status = Some(*status),
            Self::Rating(rating) => request.rating = *rating,
            Self::Notes(notes) => request.notes = clean_notes(notes),
        }
        Ok(request)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BacklogEditError {
    #[error(transparent)]
    Invalid(#[from] BacklogInvalid),

    #[error("No backlog entry with id '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Apply `edit` to the backlog entry `id`.
///
/// The store overwrites score, rating and notes with whatever it is sent, so
/// the current entry is read first and its other values carried forward.
pub async fn edit_backlog<B: BacklogStore>(
    store: &B,
    id: &str,
    edit: BacklogEdit,
) -> Result<BacklogEntry, BacklogEditError> {
    edit.validate()?;
    let entry = store
        .list_backlog(None)
        .await?
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| BacklogEditError::NotFound(id.to_string()))?;
    let request = edit.request_for(&entry)?;
    log::debug!("updating backlog entry {} ({:?})", id, edit);
    store.update_backlog(id, &request).await.map_err(|e| match e {
        LookupError::NotFound => BacklogEditError::NotFound(id.to_string()),
        e => BacklogEditError::Lookup(e),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum BacklogSubmitError {
    #[error(transparent)]
    Invalid(#[from] BacklogInvalid),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Form is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BacklogUpdate {
    SearchStarted { query: String },
    ResultsShown { query: String, count: usize },
    ResultsCleared,
    Added(BacklogEntry),
    AddFailed { message: String },
    Discarded,
}

enum Completion {
    Search {
        token: RequestToken,
        outcome: Result<Vec<SearchResult>, LookupError>,
    },
    Add(Result<BacklogEntry, LookupError>),
}

pub struct BacklogForm<C, B> {
    catalog: Rc<C>,
    store: Rc<B>,
    phase: FormPhase,
    query: String,
    gate: DebounceGate,
    session: SearchSession,
    selected: Option<SearchResult>,
    pub status: BacklogStatus,
    pub rating: Option<u8>,
    pub notes: String,
    form_error: Option<String>,
    inflight: Inflight<Completion>,
}

impl<C, B> BacklogForm<C, B>
where
    C: CatalogSource + 'static,
    B: BacklogStore + 'static,
{
    pub fn new(catalog: Rc<C>, store: Rc<B>, gate: DebounceGate) -> Self {
        Self {
            catalog,
            store,
            phase: FormPhase::Open,
            query: String::new(),
            gate,
            session: SearchSession::new(),
            selected: None,
            status: BacklogStatus::default(),
            rating: None,
            notes: String::new(),
            form_error: None,
            inflight: Inflight::new(),
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        self.session.visible_results()
    }

    pub fn selected(&self) -> Option<&SearchResult> {
        self.selected.as_ref()
    }

    /// Whether a debounce deadline or a network call is outstanding.
    pub fn has_pending(&self) -> bool {
        self.gate.is_pending() || !self.inflight.is_empty()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn on_text_changed(&mut self, text: &str) -> TextChange {
        if self.phase == FormPhase::Closed {
            return TextChange::Ignored;
        }
        self.query = text.to_string();
        match self.gate.on_text_changed(text, Instant::now()) {
            Some(GateSignal::Clear) => {
                self.session.close();
                TextChange::Cleared
            }
            _ => TextChange::Scheduled,
        }
    }

    /// Pick the visible result at `index`. Closes the dropdown.
    pub fn select(&mut self, index: usize) -> Option<&SearchResult> {
        let picked = self.session.visible_results().get(index).cloned()?;
        self.gate.reset();
        self.session.close();
        log::debug!("picked {} for backlog", picked.catalog_id);
        self.selected = Some(picked);
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Build the add request from the current selection and settings.
    pub fn request(&self) -> Result<BacklogAddRequest, BacklogInvalid> {
        let game = self.selected.as_ref().ok_or(BacklogInvalid::NoSelection)?;
        check_rating(self.rating)?;
        Ok(BacklogAddRequest {
            catalog_id: game.catalog_id,
            name: game.title.clone(),
            cover_url: game.image_url.clone(),
            release_date: game.release_date,
            backlog_status: self.status,
            igdb_score: game.igdb_score,
            rating: self.rating,
            notes: clean_notes(&self.notes),
        })
    }

    pub fn submit(&mut self) -> Result<(), BacklogSubmitError> {
        match self.phase {
            FormPhase::Closed => return Err(BacklogSubmitError::Closed),
            FormPhase::Submitting => return Err(BacklogSubmitError::InFlight),
            FormPhase::Open => {}
        }
        let request = self.request()?;
        self.form_error = None;
        self.phase = FormPhase::Submitting;

        let store = Rc::clone(&self.store);
        self.inflight.push(async move {
            Completion::Add(store.add_to_backlog(&request).await)
        });
        Ok(())
    }

    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.gate.reset();
        self.session.close();
        self.inflight.clear();
    }

    pub async fn next_update(&mut self) -> Option<BacklogUpdate> {
        loop {
            let wake = next_wake(self.gate.deadline(), &mut self.inflight).await?;
            if let Some(update) = self.handle(wake) {
                return Some(update);
            }
        }
    }

    pub async fn settle(&mut self) -> Vec<BacklogUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    fn handle(&mut self, wake: Wake<Completion>) -> Option<BacklogUpdate> {
        match wake {
            Wake::Deadline => match self.gate.poll(Instant::now())? {
                GateSignal::Trigger(text) => {
                    let query = text.trim().to_string();
                    issue_search(&self.catalog, &mut self.session, &mut self.inflight, &query, |token, outcome| {
                        Completion::Search { token, outcome }
                    });
                    Some(BacklogUpdate::SearchStarted { query })
                }
                GateSignal::Clear => None,
            },
            Wake::Done(Completion::Search { token, outcome }) => Some(match self.session.apply(token, outcome) {
                SearchApplied::Shown { query, count } => BacklogUpdate::ResultsShown { query, count },
                SearchApplied::Failed => BacklogUpdate::ResultsCleared,
                SearchApplied::Stale => BacklogUpdate::Discarded,
            }),
            Wake::Done(Completion::Add(Ok(entry))) => {
                log::debug!("added \"{}\" to backlog as {}", entry.name, entry.backlog_status);
                self.close();
                Some(BacklogUpdate::Added(entry))
            }
            Wake::Done(Completion::Add(Err(e))) => {
                log::debug!("failed to add to backlog: {}", e);
                self.phase = FormPhase::Open;
                self.form_error = Some(ADD_FAILED_MESSAGE.to_string());
                Some(BacklogUpdate::AddFailed {
                    message: ADD_FAILED_MESSAGE.to_string(),
                })
            }
        }
    }
}
