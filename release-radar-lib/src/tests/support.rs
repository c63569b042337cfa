//! Scripted collaborators for form tests.
//!
//! Each fake records its calls. A test may script the reply to a future call
//! ahead of time and receives a oneshot sender to release it whenever it
//! likes, which makes response arrival order fully controllable. Calls that
//! were not scripted answer immediately with a neutral value.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use tokio::sync::oneshot;

use release_radar_core::{
    BacklogAddRequest, BacklogEntry, BacklogStatus, BacklogUpdateRequest, CatalogId, DetailResult, Entry, EntryId, EntryPayload,
    EntryStatus, Platform, SearchResult,
};
use release_radar_lookup::{BacklogStore, CatalogSource, EntryStore, LookupError};

pub(crate) type Reply<T> = oneshot::Sender<Result<T, LookupError>>;
type Pending<T> = oneshot::Receiver<Result<T, LookupError>>;

async fn wait<T>(rx: Pending<T>) -> Result<T, LookupError> {
    rx.await
        .unwrap_or_else(|_| Err(LookupError::Api("scripted reply dropped".to_string())))
}

pub(crate) fn result(id: u64, title: &str, release_date: Option<NaiveDate>) -> SearchResult {
    SearchResult {
        catalog_id: CatalogId(id),
        title: title.to_string(),
        release_date,
        image_url: Some(format!("https://images.igdb.com/t_thumb/{id}.jpg")),
        platforms: [Platform::Pc].into_iter().collect(),
        igdb_score: Some(85),
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    searches: RefCell<Vec<String>>,
    details: RefCell<Vec<CatalogId>>,
    search_replies: RefCell<HashMap<String, VecDeque<Pending<Vec<SearchResult>>>>>,
    detail_replies: RefCell<HashMap<CatalogId, VecDeque<Pending<DetailResult>>>>,
}

impl FakeCatalog {
    /// Script the reply to the next search for exactly `query`.
    pub(crate) fn script_search(&self, query: &str) -> Reply<Vec<SearchResult>> {
        let (tx, rx) = oneshot::channel();
        self.search_replies
            .borrow_mut()
            .entry(query.to_string())
            .or_default()
            .push_back(rx);
        tx
    }

    /// Script the reply to the next detail fetch for `id`.
    pub(crate) fn script_detail(&self, id: CatalogId) -> Reply<DetailResult> {
        let (tx, rx) = oneshot::channel();
        self.detail_replies
            .borrow_mut()
            .entry(id)
            .or_default()
            .push_back(rx);
        tx
    }

    pub(crate) fn searches(&self) -> Vec<String> {
        self.searches.borrow().clone()
    }

    pub(crate) fn details(&self) -> Vec<CatalogId> {
        self.details.borrow().clone()
    }
}

impl CatalogSource for FakeCatalog {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        self.searches.borrow_mut().push(query.to_string());
        let scripted = self
            .search_replies
            .borrow_mut()
            .get_mut(query)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(rx) => wait(rx).await,
            None => Ok(Vec::new()),
        }
    }

    async fn detail(&self, id: CatalogId) -> Result<DetailResult, LookupError> {
        self.details.borrow_mut().push(id);
        let scripted = self
            .detail_replies
            .borrow_mut()
            .get_mut(&id)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(rx) => wait(rx).await,
            None => Err(LookupError::NotFound),
        }
    }
}

/// One recorded store call: `None` id for create, `Some` for update.
pub(crate) type StoreCall = (Option<EntryId>, EntryPayload);

#[derive(Default)]
pub(crate) struct FakeStore {
    calls: RefCell<Vec<StoreCall>>,
    replies: RefCell<VecDeque<Pending<Entry>>>,
}

impl FakeStore {
    pub(crate) fn script_reply(&self) -> Reply<Entry> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    async fn answer(&self, id: Option<&EntryId>, payload: &EntryPayload) -> Result<Entry, LookupError> {
        self.calls.borrow_mut().push((id.cloned(), payload.clone()));
        let scripted = self.replies.borrow_mut().pop_front();
        match scripted {
            Some(rx) => wait(rx).await,
            None => Ok(entry_from(id.map_or("new-1", |id| id.0.as_str()), payload)),
        }
    }
}

impl EntryStore for FakeStore {
    async fn create_entry(&self, payload: &EntryPayload) -> Result<Entry, LookupError> {
        self.answer(None, payload).await
    }

    async fn update_entry(&self, id: &EntryId, payload: &EntryPayload) -> Result<Entry, LookupError> {
        self.answer(Some(id), payload).await
    }

    async fn get_entry(&self, _id: &EntryId) -> Result<Entry, LookupError> {
        Err(LookupError::NotFound)
    }
}

pub(crate) fn entry_from(id: &str, payload: &EntryPayload) -> Entry {
    Entry {
        id: EntryId(id.to_string()),
        title: payload.title.clone(),
        description: payload.description.clone(),
        release_date: payload.release_date,
        platforms: payload.platforms.clone(),
        status: EntryStatus::Upcoming,
        shop_url: payload.shop_url.clone(),
        image_url: payload.image_url.clone(),
        developer: payload.developer.clone(),
        publisher: payload.publisher.clone(),
        catalog_id: payload.catalog_id,
        tba: payload.tba,
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn backlog_entry(id: &str, name: &str, status: BacklogStatus) -> BacklogEntry {
    BacklogEntry {
        id: id.to_string(),
        catalog_id: CatalogId(1),
        name: name.to_string(),
        cover_url: None,
        release_date: None,
        backlog_status: status,
        igdb_score: Some(90),
        rating: Some(7),
        notes: Some("keep this".to_string()),
        created_at: None,
        updated_at: None,
    }
}

/// Adds are scripted like the other fakes; list, update and remove work
/// against an in-memory backlog.
#[derive(Default)]
pub(crate) struct FakeBacklog {
    calls: RefCell<Vec<BacklogAddRequest>>,
    replies: RefCell<VecDeque<Pending<BacklogEntry>>>,
    entries: RefCell<Vec<BacklogEntry>>,
    updates: RefCell<Vec<(String, BacklogUpdateRequest)>>,
    lists: RefCell<Vec<Option<BacklogStatus>>>,
}

impl FakeBacklog {
    pub(crate) fn with_entries(entries: Vec<BacklogEntry>) -> Self {
        Self {
            entries: RefCell::new(entries),
            ..Self::default()
        }
    }

    pub(crate) fn entries(&self) -> Vec<BacklogEntry> {
        self.entries.borrow().clone()
    }

    pub(crate) fn updates(&self) -> Vec<(String, BacklogUpdateRequest)> {
        self.updates.borrow().clone()
    }

    pub(crate) fn lists(&self) -> Vec<Option<BacklogStatus>> {
        self.lists.borrow().clone()
    }

    pub(crate) fn script_reply(&self) -> Reply<BacklogEntry> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<BacklogAddRequest> {
        self.calls.borrow().clone()
    }
}

impl BacklogStore for FakeBacklog {
    async fn add_to_backlog(&self, request: &BacklogAddRequest) -> Result<BacklogEntry, LookupError> {
        self.calls.borrow_mut().push(request.clone());
        let scripted = self.replies.borrow_mut().pop_front();
        match scripted {
            Some(rx) => wait(rx).await,
            None => Ok(BacklogEntry {
                id: "b-1".to_string(),
                catalog_id: request.catalog_id,
                name: request.name.clone(),
                cover_url: request.cover_url.clone(),
                release_date: request.release_date,
                backlog_status: request.backlog_status,
                igdb_score: request.igdb_score,
                rating: request.rating,
                notes: request.notes.clone(),
                created_at: None,
                updated_at: None,
            }),
        }
    }

    async fn list_backlog(&self, status: Option<BacklogStatus>) -> Result<Vec<BacklogEntry>, LookupError> {
        self.lists.borrow_mut().push(status);
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|e| status.is_none_or(|s| e.backlog_status == s))
            .cloned()
            .collect())
    }

    async fn update_backlog(&self, id: &str, request: &BacklogUpdateRequest) -> Result<BacklogEntry, LookupError> {
        self.updates.borrow_mut().push((id.to_string(), request.clone()));
        let mut entries = self.entries.borrow_mut();
        let entry = entries.iter_mut().find(|e| e.id == id).ok_or(LookupError::NotFound)?;
        if let Some(status) = request.backlog_status {
            entry.backlog_status = status;
        }
        entry.igdb_score = request.igdb_score;
        entry.rating = request.rating;
        entry.notes = request.notes.clone();
        Ok(entry.clone())
    }

    async fn remove_backlog(&self, id: &str) -> Result<(), LookupError> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(LookupError::NotFound);
        }
        Ok(())
    }
}
