use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use release_radar_core::CatalogId;
use release_radar_lookup::CatalogSource;

use super::{catalog, format_platforms, load_settings, print_field, print_results, runtime};
use crate::{CliError, spinner};

/// One-shot catalog search.
pub(crate) fn run_search(query: &str, quiet: bool) -> Result<(), CliError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CliError::config("Search text is empty"));
    }
    let settings = load_settings()?;
    let catalog = catalog(&settings)?;
    let rt = runtime()?;

    let results = rt.block_on(async {
        let pb = spinner::start(quiet, format!("Searching for \"{}\"...", query));
        let results = catalog.search(query).await;
        pb.finish_and_clear();
        results
    })?;

    log::info!(
        "{} {}",
        "Results for".if_supports_color(Stdout, |t| t.bold()),
        format!("\"{}\"", query).if_supports_color(Stdout, |t| t.cyan()),
    );
    print_results(&results);
    for result in &results {
        log::debug!("  {} -> catalog id {}", result.title, result.catalog_id);
    }
    Ok(())
}

/// Print one catalog detail record.
pub(crate) fn run_detail(id: CatalogId, quiet: bool) -> Result<(), CliError> {
    let settings = load_settings()?;
    let catalog = catalog(&settings)?;
    let rt = runtime()?;

    let detail = rt.block_on(async {
        let pb = spinner::start(quiet, format!("Fetching catalog entry {}...", id));
        let detail = catalog.detail(id).await;
        pb.finish_and_clear();
        detail
    })?;

    let title = detail.title.as_deref().unwrap_or("(untitled)");
    log::info!(
        "{} {}",
        title.if_supports_color(Stdout, |t| t.bold()),
        format!("#{}", id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    let release = detail.release_date.map(|d| d.format("%Y-%m-%d").to_string());
    print_field("Release", release.as_deref().or(Some("TBA")));
    print_field("Platforms", Some(&format_platforms(&detail.platforms)));
    print_field("Developer", detail.developer.as_deref());
    print_field("Publisher", detail.publisher.as_deref());
    print_field("Image", detail.image_url.as_deref());
    if let Some(description) = &detail.description {
        log::info!("");
        log::info!("{}", description);
    }
    Ok(())
}
