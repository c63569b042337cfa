pub(crate) mod add;
pub(crate) mod backlog;
pub(crate) mod config;
pub(crate) mod search;

use std::collections::BTreeSet;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use release_radar_core::{CatalogId, DetailResult, Platform, SearchResult};
use release_radar_lib::{LookupSourceKind, Settings};
use release_radar_lookup::{CatalogSource, IgdbClient, LookupError, TrackerClient};

use crate::CliError;

/// The catalog selected by `lookup.source`.
pub(crate) enum Catalog {
    Backend(TrackerClient),
    Igdb(IgdbClient),
}

impl CatalogSource for Catalog {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, LookupError> {
        match self {
            Self::Backend(c) => c.search(query).await,
            Self::Igdb(c) => c.search(query).await,
        }
    }

    async fn detail(&self, id: CatalogId) -> Result<DetailResult, LookupError> {
        match self {
            Self::Backend(c) => c.detail(id).await,
            Self::Igdb(c) => c.detail(id).await,
        }
    }
}

pub(crate) fn load_settings() -> Result<Settings, CliError> {
    Ok(release_radar_lib::settings::load()?.settings)
}

pub(crate) fn tracker(settings: &Settings) -> Result<TrackerClient, CliError> {
    Ok(TrackerClient::new(
        &settings.backend_url,
        settings.session_cookie.as_deref(),
    )?)
}

pub(crate) fn catalog(settings: &Settings) -> Result<Catalog, CliError> {
    match settings.lookup_source {
        LookupSourceKind::Backend => Ok(Catalog::Backend(tracker(settings)?)),
        LookupSourceKind::Igdb => {
            let client = IgdbClient::new(settings.igdb.clone())?;
            if !client.is_configured() {
                return Err(CliError::config(
                    "lookup.source is 'igdb' but IGDB credentials are not set. \
                     Run 'release-radar config set igdb.client_id <id>' and igdb.client_secret.",
                ));
            }
            Ok(Catalog::Igdb(client))
        }
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))
}

pub(crate) fn format_platforms(platforms: &BTreeSet<Platform>) -> String {
    platforms
        .iter()
        .map(|p| p.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One numbered line of a result list (1-based, as `:pick` expects).
pub(crate) fn print_result(index: usize, result: &SearchResult) {
    let year = result
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let platforms = if result.platforms.is_empty() {
        String::new()
    } else {
        format!(" [{}]", format_platforms(&result.platforms))
    };
    log::info!(
        "  {} {}{}{}",
        format!("{:>2}.", index + 1).if_supports_color(Stdout, |t| t.dimmed()),
        result.title.if_supports_color(Stdout, |t| t.bold()),
        year,
        platforms.if_supports_color(Stdout, |t| t.cyan()),
    );
}

pub(crate) fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        log::info!("  {}", "No matches".if_supports_color(Stdout, |t| t.dimmed()));
        return;
    }
    for (i, result) in results.iter().enumerate() {
        print_result(i, result);
    }
}

/// `label: value` with the label highlighted; absent values shown dimmed.
pub(crate) fn print_field(label: &str, value: Option<&str>) {
    let label = format!("{}:", label);
    match value.filter(|v| !v.is_empty()) {
        Some(v) => log::info!("  {:<13} {}", label.if_supports_color(Stdout, |t| t.cyan()), v),
        None => log::info!(
            "  {:<13} {}",
            label.if_supports_color(Stdout, |t| t.cyan()),
            "-".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}
