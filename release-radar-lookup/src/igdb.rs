//! Direct IGDB catalog source.
//!
//! Authenticates with a Twitch client-credentials token, cached until shortly
//! before it expires, and queries the `/games` endpoint with Apicalypse
//! bodies.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use release_radar_core::{CatalogId, DetailResult, SearchResult};

use crate::error::LookupError;
use crate::source::CatalogSource;
use crate::types::{IgdbGame, TokenResponse};

const BASE_URL: &str = "https://api.igdb.com/v4";
const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
/// IGDB allows four requests per second.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);
/// Refresh the token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(300);
const SEARCH_LIMIT: u32 = 10;

/// Twitch application credentials used to obtain IGDB tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgdbCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl IgdbCredentials {
    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// HTTP client for the IGDB API with token caching and rate limiting.
pub struct IgdbClient {
    http: reqwest::Client,
    creds: IgdbCredentials,
    token: Arc<Mutex<Option<CachedToken>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl IgdbClient {
    pub fn new(creds: IgdbCredentials) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            creds,
            token: Arc::new(Mutex::new(None)),
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Whether both client id and secret are set.
    pub fn is_configured(&self) -> bool {
        self.creds.is_configured()
    }

    /// Return a valid access token, fetching a new one if the cached token is
    /// missing or about to expire.
    async fn access_token(&self) -> Result<String, LookupError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        log::debug!("fetching new IGDB access token");
        let resp = self
            .http
            .post(TOKEN_URL)
            .query(&[
                ("client_id", self.creds.client_id.as_str()),
                ("client_secret", self.creds.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Config(format!(
                "Twitch rejected IGDB credentials (HTTP {})",
                status.as_u16()
            )));
        }

        let token: TokenResponse = resp.json().await?;
        log::debug!("IGDB token fetched, expires in {}s", token.expires_in);

        let lifetime = Duration::from_secs(token.expires_in);
        let refresh_at = Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            refresh_at,
        });
        Ok(value)
    }

    /// Post an Apicalypse query to `/games`.
    async fn query_games(&self, body: String) -> Result<Vec<IgdbGame>, LookupError> {
        if !self.creds.is_configured() {
            return Err(LookupError::NotConfigured(
                "IGDB client id/secret not set".to_string(),
            ));
        }

        let token = self.access_token().await?;
        self.rate_limit().await;

        log::debug!("IGDB query: {}", body);
        let resp = self
            .http
            .post(format!("{}/games", BASE_URL))
            .header("Client-ID", &self.creds.client_id)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Drop the cached token so the next call fetches a fresh one.
            *self.token.lock().await = None;
            return Err(LookupError::Api("IGDB rejected the access token".to_string()));
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

        Ok(serde_json::from_str(&text)?)
    }

    /// Enforce rate limiting: wait until at least MIN_REQUEST_INTERVAL has
    /// passed since the last API request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Apicalypse body for a fuzzy title search.
///
/// Excludes statuses 5-8 (offline, cancelled, rumored, delisted).
pub fn search_query(query: &str) -> String {
    format!(
        "search \"{}\"; fields name,first_release_date,cover.url,platforms.id,status,aggregated_rating; \
         where status = null | status != (5,6,7,8); limit {};",
        escape_query(query),
        SEARCH_LIMIT
    )
}

/// Apicalypse body for the detail record of a single game.
pub fn detail_query(id: CatalogId) -> String {
    format!(
        "fields name,first_release_date,cover.url,platforms.id,\
         involved_companies.company.name,involved_companies.developer,\
         involved_companies.publisher,summary; where id = {}; limit 1;",
        id
    )
}

fn escape_query(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}

impl CatalogSource for IgdbClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        let games = self.query_games(search_query(query)).await?;
        Ok(games.iter().map(IgdbGame::to_search_result).collect())
    }

    async fn detail(&self, id: CatalogId) -> Result<DetailResult, LookupError> {
        let games = self.query_games(detail_query(id)).await?;
        games
            .first()
            .map(IgdbGame::to_detail)
            .ok_or(LookupError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_escapes_quotes() {
        let body = search_query(r#"The "Best" Game"#);
        assert!(body.starts_with(r#"search "The \"Best\" Game";"#));
        assert!(body.contains("status != (5,6,7,8)"));
        assert!(body.ends_with("limit 10;"));
    }

    #[test]
    fn detail_query_targets_one_id() {
        let body = detail_query(CatalogId(119133));
        assert!(body.contains("where id = 119133;"));
        assert!(body.contains("involved_companies.company.name"));
        assert!(body.ends_with("limit 1;"));
    }

    #[test]
    fn blank_credentials_are_not_configured() {
        let creds = IgdbCredentials {
            client_id: "abc".to_string(),
            client_secret: "  ".to_string(),
        };
        assert!(!creds.is_configured());
    }

    #[tokio::test(start_paused = true)]
    async fn first_request_is_not_delayed_and_later_ones_are_spaced() {
        let client = IgdbClient::new(IgdbCredentials::default()).unwrap();
        let start = Instant::now();
        client.rate_limit().await;
        assert_eq!(Instant::now(), start);

        client.rate_limit().await;
        assert!(Instant::now() - start >= MIN_REQUEST_INTERVAL);

        tokio::time::advance(Duration::from_secs(1)).await;
        let before = Instant::now();
        client.rate_limit().await;
        assert_eq!(Instant::now(), before);
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let client = IgdbClient::new(IgdbCredentials::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.search("zelda").await.unwrap_err();
        assert!(matches!(err, LookupError::NotConfigured(_)));
    }
}
