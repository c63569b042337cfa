use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::time::Duration;

use release_radar_core::{
    BacklogAddRequest, BacklogEntry, BacklogStatus, BacklogUpdateRequest, CatalogId, DetailResult, Entry, EntryId, EntryPayload,
    SearchResult,
};

use crate::error::LookupError;
use crate::source::{BacklogStore, CatalogSource, EntryStore};

/// Default tracker backend API root.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the tracker backend.
///
/// The backend proxies catalog lookups (`/games/lookup`) and persists
/// entries (`/games`) and backlog items (`/backlog`).
pub struct TrackerClient {
    http: reqwest::Client,
    base_url: String,
}

impl TrackerClient {
    /// Create a client for the given API root. `session_cookie` is sent as a
    /// `Cookie` header on every request when set.
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| LookupError::Config(format!("Invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the response status and decode the JSON body.
    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, LookupError> {
        let text = Self::read_text(resp).await?;
        serde_json::from_str(&text).map_err(|e| {
            LookupError::Api(format!(
                "Failed to parse response: {e}. Response: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    /// Map error statuses and return the raw body of a successful response.
    async fn read_text(resp: reqwest::Response) -> Result<String, LookupError> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(LookupError::Api(
                "Not signed in to the tracker backend".to_string(),
            ));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimit);
        }

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(LookupError::Server {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }
        Ok(text)
    }
}

impl CatalogSource for TrackerClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        log::debug!("Backend lookup search: {:?}", query);
        let resp = self
            .http
            .get(self.url("/games/lookup"))
            .query(&[("q", query)])
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn detail(&self, id: CatalogId) -> Result<DetailResult, LookupError> {
        log::debug!("Backend lookup detail: {}", id);
        let resp = self
            .http
            .get(self.url(&format!("/games/lookup/{}", id)))
            .send()
            .await?;
        Self::read_json(resp).await
    }
}

impl EntryStore for TrackerClient {
    async fn create_entry(&self, payload: &EntryPayload) -> Result<Entry, LookupError> {
        log::debug!("Creating entry '{}'", payload.title);
        let resp = self
            .http
            .post(self.url("/games"))
            .json(payload)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        payload: &EntryPayload,
    ) -> Result<Entry, LookupError> {
        log::debug!("Updating entry {} ('{}')", id, payload.title);
        let resp = self
            .http
            .put(self.url(&format!("/games/{}", id)))
            .json(payload)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn get_entry(&self, id: &EntryId) -> Result<Entry, LookupError> {
        let resp = self
            .http
            .get(self.url(&format!("/games/{}", id)))
            .send()
            .await?;
        Self::read_json(resp).await
    }
}

impl BacklogStore for TrackerClient {
    async fn add_to_backlog(
        &self,
        request: &BacklogAddRequest,
    ) -> Result<BacklogEntry, LookupError> {
        log::debug!("Adding '{}' to backlog", request.name);
        let resp = self
            .http
            .post(self.url("/backlog"))
            .json(request)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn list_backlog(
        &self,
        status: Option<BacklogStatus>,
    ) -> Result<Vec<BacklogEntry>, LookupError> {
        let mut req = self.http.get(self.url("/backlog"));
        if let Some(status) = status {
            req = req.query(&[("status", status.wire_tag())]);
        }
        Self::read_json(req.send().await?).await
    }

    async fn update_backlog(
        &self,
        id: &str,
        request: &BacklogUpdateRequest,
    ) -> Result<BacklogEntry, LookupError> {
        log::debug!("Updating backlog entry {}", id);
        let resp = self
            .http
            .put(self.url(&format!("/backlog/{}", id)))
            .json(request)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn remove_backlog(&self, id: &str) -> Result<(), LookupError> {
        log::debug!("Removing backlog entry {}", id);
        let resp = self
            .http
            .delete(self.url(&format!("/backlog/{}", id)))
            .send()
            .await?;
        Self::read_text(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = TrackerClient::new("http://localhost:8080/api/v1/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(
            client.url("/games/lookup"),
            "http://localhost:8080/api/v1/games/lookup"
        );
    }

    #[test]
    fn invalid_cookie_is_a_config_error() {
        let err = TrackerClient::new(DEFAULT_BACKEND_URL, Some("bad\ncookie"))
            .err()
            .unwrap();
        assert!(matches!(err, LookupError::Config(_)));
    }
}
