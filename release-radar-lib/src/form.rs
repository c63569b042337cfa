//! The assisted-entry form: wires the debounce gate, query suppressor,
//! search session and prefill merger around one draft.
//!
//! The form is driven from a single task. User operations (`on_text_changed`,
//! `select`, `submit`, ...) are synchronous and only schedule work; the owner
//! then awaits [`EntryForm::next_update`], which waits for the debounce
//! deadline or the next completed network call, applies it through the
//! liveness checks and reports what visibly changed.

use std::rc::Rc;

use tokio::time::Instant;

use release_radar_core::{CatalogId, DetailResult, Entry, EntryId, SearchResult};
use release_radar_lookup::{CatalogSource, EntryStore, LookupError};

use crate::async_util::{Inflight, Wake, next_wake};
use crate::debounce::{DebounceGate, GateSignal};
use crate::draft::{Draft, ValidationErrors, normalize};
use crate::error::{SAVE_FAILED_MESSAGE, SubmitError};
use crate::prefill::{PrefillApplied, PrefillMerger, PrefillState, PrefillToken};
use crate::session::{RequestToken, SearchApplied, SearchSession};
use crate::suppress::QuerySuppressor;

/// Whether the form creates a new entry or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Open,
    Submitting,
    Closed,
}

/// Outcome of a title change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChange {
    /// Echo of a programmatic write; nothing happened.
    Suppressed,
    /// Search (re)scheduled for after the quiet period.
    Scheduled,
    /// Input too short; results hidden.
    Cleared,
    /// The form is closed.
    Ignored,
}

/// A visible change produced by [`EntryForm::next_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    /// The quiet period elapsed and a catalog search went out.
    SearchStarted { query: String },
    ResultsShown { query: String, count: usize },
    /// The live search failed; the dropdown is hidden.
    ResultsCleared,
    /// Detail merged into the draft. UI bindings should display
    /// `rewritten_title` and echo it back through `on_text_changed`.
    Prefilled {
        catalog_id: CatalogId,
        rewritten_title: Option<String>,
    },
    /// Detail fetch failed; search-result fields were merged instead.
    PrefillFellBack {
        catalog_id: CatalogId,
        rewritten_title: Option<String>,
    },
    Submitted(Entry),
    /// The store rejected the submission; the draft is intact.
    SubmitFailed { message: String },
    /// A stale response arrived and was dropped.
    Discarded,
}

enum Completion {
    Search {
        token: RequestToken,
        outcome: Result<Vec<SearchResult>, LookupError>,
    },
    Detail {
        token: PrefillToken,
        outcome: Result<DetailResult, LookupError>,
    },
    Submit(Result<Entry, LookupError>),
}

pub struct EntryForm<C, S> {
    catalog: Rc<C>,
    store: Rc<S>,
    mode: FormMode,
    phase: FormPhase,
    draft: Draft,
    gate: DebounceGate,
    suppressor: QuerySuppressor,
    session: SearchSession,
    prefill: PrefillMerger,
    errors: ValidationErrors,
    form_error: Option<String>,
    inflight: Inflight<Completion>,
}

impl<C, S> EntryForm<C, S>
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    /// Open an empty form for a new entry.
    pub fn new(catalog: Rc<C>, store: Rc<S>, gate: DebounceGate) -> Self {
        Self::with_draft(catalog, store, gate, FormMode::Create, Draft::new())
    }

    /// Open a form seeded from an existing entry; submission updates it.
    pub fn edit(catalog: Rc<C>, store: Rc<S>, gate: DebounceGate, entry: &Entry) -> Self {
        Self::with_draft(
            catalog,
            store,
            gate,
            FormMode::Edit(entry.id.clone()),
            Draft::from_entry(entry),
        )
    }

    fn with_draft(catalog: Rc<C>, store: Rc<S>, gate: DebounceGate, mode: FormMode, draft: Draft) -> Self {
        Self {
            catalog,
            store,
            mode,
            phase: FormPhase::Open,
            draft,
            gate,
            suppressor: QuerySuppressor::new(),
            session: SearchSession::new(),
            prefill: PrefillMerger::new(),
            errors: ValidationErrors::default(),
            form_error: None,
            inflight: Inflight::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access for every field except the title, which only changes
    /// through [`on_text_changed`](Self::on_text_changed).
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn prefill_state(&self) -> PrefillState {
        self.prefill.state()
    }

    pub fn results(&self) -> &[SearchResult] {
        self.session.visible_results()
    }

    pub fn is_searching(&self) -> bool {
        self.session.is_searching()
    }

    /// Whether a debounce deadline or a network call is outstanding.
    pub fn has_pending(&self) -> bool {
        self.gate.is_pending() || !self.inflight.is_empty()
    }

    /// Per-field messages from the last rejected submission.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Form-level message from the last failed save.
    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Handle a change of the title field's text.
    pub fn on_text_changed(&mut self, text: &str) -> TextChange {
        if self.phase == FormPhase::Closed {
            return TextChange::Ignored;
        }
        if self.suppressor.consume_suppression() {
            log::debug!("suppressed echo of programmatic title write");
            return TextChange::Suppressed;
        }

        self.draft.set_title(text);
        if self.prefill.state() != PrefillState::NotStarted {
            // The title no longer matches the prefilled record.
            self.prefill.invalidate();
        }

        match self.gate.on_text_changed(text, Instant::now()) {
            Some(GateSignal::Clear) => {
                self.session.close();
                TextChange::Cleared
            }
            _ => TextChange::Scheduled,
        }
    }

    /// Select the visible result at `index` and start prefilling from it.
    /// Returns `None` if there is no such result.
    pub fn select(&mut self, index: usize) -> Option<CatalogId> {
        if self.phase == FormPhase::Closed {
            return None;
        }
        let selected = self.session.visible_results().get(index).cloned()?;
        self.gate.reset();

        let token = self
            .prefill
            .resolve(selected, &mut self.session, &mut self.draft);
        let id = token.catalog_id();
        let catalog = Rc::clone(&self.catalog);
        self.inflight.push(async move {
            let outcome = catalog.detail(id).await;
            Completion::Detail { token, outcome }
        });
        log::debug!("selected catalog entry {}", id);
        Some(id)
    }

    /// Hide the dropdown (dismissal or focus loss).
    pub fn close_dropdown(&mut self) {
        self.gate.reset();
        self.session.close();
    }

    /// Validate and send the draft to the store.
    ///
    /// On validation failure nothing is sent and the per-field messages are
    /// kept in [`errors`](Self::errors). The store's answer arrives through
    /// [`next_update`](Self::next_update).
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        match self.phase {
            FormPhase::Closed => return Err(SubmitError::Closed),
            FormPhase::Submitting => return Err(SubmitError::InFlight),
            FormPhase::Open => {}
        }

        let payload = match normalize(&self.draft) {
            Ok(payload) => payload,
            Err(errors) => {
                log::debug!("submission blocked: {}", errors);
                self.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };

        self.errors = ValidationErrors::default();
        self.form_error = None;
        self.phase = FormPhase::Submitting;

        let store = Rc::clone(&self.store);
        let mode = self.mode.clone();
        self.inflight.push(async move {
            let outcome = match &mode {
                FormMode::Create => store.create_entry(&payload).await,
                FormMode::Edit(id) => store.update_entry(id, &payload).await,
            };
            Completion::Submit(outcome)
        });
        Ok(())
    }

    /// Close the form, discarding every in-flight operation.
    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.gate.reset();
        self.session.close();
        self.prefill.invalidate();
        self.inflight.clear();
    }

    /// Wait for and apply the next event. Returns `None` once nothing is
    /// pending (no debounce deadline, no network call in flight).
    pub async fn next_update(&mut self) -> Option<FormUpdate> {
        loop {
            let wake = next_wake(self.gate.deadline(), &mut self.inflight).await?;
            if let Some(update) = self.handle(wake) {
                return Some(update);
            }
        }
    }

    /// Drive the form until it is idle, collecting every update.
    pub async fn settle(&mut self) -> Vec<FormUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }

    fn handle(&mut self, wake: Wake<Completion>) -> Option<FormUpdate> {
        match wake {
            Wake::Deadline => match self.gate.poll(Instant::now())? {
                GateSignal::Trigger(text) => {
                    let query = text.trim().to_string();
                    issue_search(&self.catalog, &mut self.session, &mut self.inflight, &query, |token, outcome| {
                        Completion::Search { token, outcome }
                    });
                    Some(FormUpdate::SearchStarted { query })
                }
                GateSignal::Clear => None,
            },
            Wake::Done(Completion::Search { token, outcome }) => {
                Some(search_update(self.session.apply(token, outcome)))
            }
            Wake::Done(Completion::Detail { token, outcome }) => {
                let applied = self
                    .prefill
                    .apply(token, outcome, &mut self.draft, &mut self.suppressor);
                Some(match applied {
                    PrefillApplied::Merged {
                        catalog_id,
                        rewritten_title,
                    } => FormUpdate::Prefilled {
                        catalog_id,
                        rewritten_title,
                    },
                    PrefillApplied::FellBack {
                        catalog_id,
                        rewritten_title,
                    } => FormUpdate::PrefillFellBack {
                        catalog_id,
                        rewritten_title,
                    },
                    PrefillApplied::Stale => FormUpdate::Discarded,
                })
            }
            Wake::Done(Completion::Submit(outcome)) => Some(self.finish_submit(outcome)),
        }
    }

    fn finish_submit(&mut self, outcome: Result<Entry, LookupError>) -> FormUpdate {
        match outcome {
            Ok(entry) => {
                log::debug!("saved \"{}\" ({})", entry.title, entry.id);
                self.close();
                FormUpdate::Submitted(entry)
            }
            Err(e) => {
                log::debug!("failed to save entry: {}", e);
                self.phase = FormPhase::Open;
                self.form_error = Some(SAVE_FAILED_MESSAGE.to_string());
                FormUpdate::SubmitFailed {
                    message: SAVE_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}

/// Start a catalog search for `query` under a fresh session token.
pub(crate) fn issue_search<C, T>(
    catalog: &Rc<C>,
    session: &mut SearchSession,
    inflight: &mut Inflight<T>,
    query: &str,
    wrap: fn(RequestToken, Result<Vec<SearchResult>, LookupError>) -> T,
) where
    C: CatalogSource + 'static,
    T: 'static,
{
    let token = session.search(query);
    let catalog = Rc::clone(catalog);
    let query = query.to_string();
    inflight.push(async move {
        let outcome = catalog.search(&query).await;
        wrap(token, outcome)
    });
}

fn search_update(applied: SearchApplied) -> FormUpdate {
    match applied {
        SearchApplied::Shown { query, count } => FormUpdate::ResultsShown { query, count },
        SearchApplied::Failed => FormUpdate::ResultsCleared,
        SearchApplied::Stale => FormUpdate::Discarded,
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
