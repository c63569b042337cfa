//! Backlog commands: the interactive add flow plus list, status, rating,
//! notes and removal of existing entries.

use std::rc::Rc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::io::{AsyncBufReadExt, BufReader};

use release_radar_core::{BacklogEntry, BacklogStatus};
use release_radar_lib::{
    BacklogEdit, BacklogForm, BacklogSubmitError, BacklogUpdate, FormPhase, edit_backlog,
};
use release_radar_lookup::{BacklogStore, CatalogSource};

use super::{catalog, load_settings, print_field, print_results, runtime, tracker};
use crate::{CliError, spinner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BacklogCommand {
    Query(String),
    Pick(usize),
    Unpick,
    Status(BacklogStatus),
    Rating(Option<u8>),
    Notes(String),
    Show,
    Submit,
    Quit,
    Help,
}

/// A rating argument: a number, or `none`/empty to clear. Range is checked
/// by the library.
pub(crate) fn parse_rating(arg: &str) -> Result<Option<u8>, String> {
    match arg.trim() {
        "" | "none" => Ok(None),
        n => n
            .parse::<u8>()
            .map(Some)
            .map_err(|_| format!("Rating must be a number, got '{}'", n)),
    }
}

pub(crate) fn parse_command(line: &str) -> Result<BacklogCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(BacklogCommand::Query(line.to_string()));
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "pick" | "p" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(BacklogCommand::Pick(n - 1)),
            _ => Err(format!("Usage: :pick N (a result number), got '{}'", arg)),
        },
        "unpick" => Ok(BacklogCommand::Unpick),
        "status" => arg
            .parse::<BacklogStatus>()
            .map(BacklogCommand::Status)
            .map_err(|e| e.to_string()),
        "rating" => parse_rating(arg).map(BacklogCommand::Rating),
        "notes" => Ok(BacklogCommand::Notes(arg.to_string())),
        "show" => Ok(BacklogCommand::Show),
        "submit" | "save" => Ok(BacklogCommand::Submit),
        "quit" | "q" => Ok(BacklogCommand::Quit),
        "help" | "h" | "?" => Ok(BacklogCommand::Help),
        other => Err(format!("Unknown command ':{}' (try :help)", other)),
    }
}

/// `release-radar backlog add [query]`
pub(crate) fn run_backlog_add(query: Option<String>) -> Result<(), CliError> {
    let settings = load_settings()?;
    let catalog = Rc::new(catalog(&settings)?);
    let store = Rc::new(tracker(&settings)?);
    let rt = runtime()?;

    log::info!("{}", "Add to backlog".if_supports_color(Stdout, |t| t.bold()));
    print_help();
    let mut form = BacklogForm::new(catalog, store, settings.debounce_gate());
    if let Some(query) = query {
        form.on_text_changed(&query);
    }
    rt.block_on(drive(form))
}

async fn drive<C, B>(mut form: BacklogForm<C, B>) -> Result<(), CliError>
where
    C: CatalogSource + 'static,
    B: BacklogStore + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = form.next_update(), if form.has_pending() => {
                if let Some(update) = update {
                    if report(&form, update) {
                        return Ok(());
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    for update in form.settle().await {
                        if report(&form, update) {
                            return Ok(());
                        }
                    }
                    break;
                };
                match parse_command(&line) {
                    Ok(BacklogCommand::Quit) => break,
                    Ok(command) => apply(&mut form, command),
                    Err(msg) => log::warn!("{}", msg),
                }
            }
        }
    }

    if form.phase() != FormPhase::Closed {
        form.close();
        log::info!("{}", "Nothing added.".if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

fn apply<C, B>(form: &mut BacklogForm<C, B>, command: BacklogCommand)
where
    C: CatalogSource + 'static,
    B: BacklogStore + 'static,
{
    match command {
        BacklogCommand::Query(text) => {
            form.on_text_changed(&text);
        }
        BacklogCommand::Pick(index) => match form.select(index) {
            Some(game) => log::info!(
                "{} Selected {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                game.title.if_supports_color(Stdout, |t| t.bold()),
            ),
            None => log::warn!("No result #{} to pick", index + 1),
        },
        BacklogCommand::Unpick => {
            form.clear_selection();
            log::info!("  {}", "Selection cleared".if_supports_color(Stdout, |t| t.dimmed()));
        }
        BacklogCommand::Status(status) => form.status = status,
        BacklogCommand::Rating(rating) => form.rating = rating,
        BacklogCommand::Notes(notes) => form.notes = notes,
        BacklogCommand::Show => print_selection(form),
        BacklogCommand::Submit => match form.submit() {
            Ok(()) => log::info!("  {}", "Adding...".if_supports_color(Stdout, |t| t.dimmed())),
            Err(BacklogSubmitError::Invalid(e)) => log::warn!("Cannot add yet: {}", e),
            Err(e) => log::warn!("{}", e),
        },
        BacklogCommand::Help => print_help(),
        BacklogCommand::Quit => {}
    }
}

/// Print one update. Returns `true` once the game has been added.
fn report<C, B>(form: &BacklogForm<C, B>, update: BacklogUpdate) -> bool
where
    C: CatalogSource + 'static,
    B: BacklogStore + 'static,
{
    match update {
        BacklogUpdate::SearchStarted { query } => {
            log::debug!("searching catalog for {:?}", query);
        }
        BacklogUpdate::ResultsShown { query, .. } => {
            log::info!(
                "Matches for {}:",
                format!("\"{}\"", query).if_supports_color(Stdout, |t| t.cyan())
            );
            print_results(form.results());
        }
        BacklogUpdate::ResultsCleared | BacklogUpdate::Discarded => {}
        BacklogUpdate::Added(entry) => {
            log::info!(
                "{} Added {} to your backlog ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                entry.name.if_supports_color(Stdout, |t| t.bold()),
                entry.backlog_status,
            );
            return true;
        }
        BacklogUpdate::AddFailed { message } => {
            log::warn!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                message
            );
        }
    }
    false
}

fn print_selection<C, B>(form: &BacklogForm<C, B>)
where
    C: CatalogSource + 'static,
    B: BacklogStore + 'static,
{
    let rating = form.rating.map(|r| format!("{}/10", r));
    print_field("Game", form.selected().map(|g| g.title.as_str()));
    print_field("Status", Some(form.status.label()));
    print_field("Rating", rating.as_deref());
    print_field("Notes", Some(&form.notes));
}

fn print_help() {
    let lines = [
        ("<text>", "search the catalog"),
        (":pick N", "choose result N"),
        (":unpick", "clear the chosen game"),
        (":status S", "want, playing, completed, dropped"),
        (":rating N|none", "rating from 1 to 10"),
        (":notes TEXT", "free-form notes"),
        (":show", "print the selection"),
        (":submit", "add to backlog"),
        (":quit", "exit without adding"),
    ];
    for (command, help) in lines {
        log::info!(
            "  {:<22} {}",
            command.if_supports_color(Stdout, |t| t.cyan()),
            help.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// `release-radar backlog list [--status S]`
pub(crate) fn run_backlog_list(status: Option<BacklogStatus>, quiet: bool) -> Result<(), CliError> {
    let settings = load_settings()?;
    let store = tracker(&settings)?;
    let rt = runtime()?;

    let entries = rt.block_on(async {
        let pb = spinner::start(quiet, "Loading backlog...");
        let entries = store.list_backlog(status).await;
        pb.finish_and_clear();
        entries
    })?;

    let heading = match status {
        Some(status) => format!("Backlog: {}", status),
        None => "Backlog".to_string(),
    };
    log::info!("{}", heading.if_supports_color(Stdout, |t| t.bold()));
    if entries.is_empty() {
        log::info!("  {}", "Nothing here yet".if_supports_color(Stdout, |t| t.dimmed()));
    }
    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

/// `release-radar backlog status|rate|notes ID ...`
pub(crate) fn run_backlog_edit(id: &str, edit: BacklogEdit, quiet: bool) -> Result<(), CliError> {
    edit.validate().map_err(|e| CliError::config(e.to_string()))?;
    let settings = load_settings()?;
    let store = tracker(&settings)?;
    let rt = runtime()?;

    let entry = rt.block_on(async {
        let pb = spinner::start(quiet, "Updating backlog...");
        let entry = edit_backlog(&store, id, edit).await;
        pb.finish_and_clear();
        entry
    })?;

    log::info!(
        "{} Updated {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        entry.name.if_supports_color(Stdout, |t| t.bold()),
    );
    print_entry(&entry);
    Ok(())
}

/// `release-radar backlog remove ID`
pub(crate) fn run_backlog_remove(id: &str, quiet: bool) -> Result<(), CliError> {
    let settings = load_settings()?;
    let store = tracker(&settings)?;
    let rt = runtime()?;

    rt.block_on(async {
        let pb = spinner::start(quiet, "Removing from backlog...");
        let removed = store.remove_backlog(id).await;
        pb.finish_and_clear();
        removed
    })?;

    log::info!(
        "{} Removed {} from your backlog",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        id.if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

fn entry_summary(entry: &BacklogEntry) -> String {
    let mut parts = vec![entry.backlog_status.label().to_string()];
    if let Some(rating) = entry.rating {
        parts.push(format!("{}/10", rating));
    }
    if let Some(score) = entry.igdb_score {
        parts.push(format!("critics {}", score));
    }
    parts.join(", ")
}

fn print_entry(entry: &BacklogEntry) {
    log::info!(
        "  {} {} {}",
        entry.id.if_supports_color(Stdout, |t| t.dimmed()),
        entry.name.if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", entry_summary(entry)).if_supports_color(Stdout, |t| t.cyan()),
    );
    if let Some(notes) = &entry.notes {
        log::info!("      {}", notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_short_names_and_labels() {
        assert_eq!(
            parse_command(":status playing"),
            Ok(BacklogCommand::Status(BacklogStatus::Playing))
        );
        assert_eq!(
            parse_command(":status Want to Play"),
            Ok(BacklogCommand::Status(BacklogStatus::WantToPlay))
        );
        assert!(parse_command(":status abandoned").is_err());
    }

    #[test]
    fn rating_can_be_cleared() {
        assert_eq!(parse_command(":rating 8"), Ok(BacklogCommand::Rating(Some(8))));
        assert_eq!(parse_command(":rating none"), Ok(BacklogCommand::Rating(None)));
        assert_eq!(parse_command(":rating"), Ok(BacklogCommand::Rating(None)));
        assert!(parse_command(":rating ten").is_err());
    }

    #[test]
    fn rate_argument_shares_the_rating_parser() {
        assert_eq!(parse_rating("7"), Ok(Some(7)));
        assert_eq!(parse_rating(" none "), Ok(None));
        assert_eq!(parse_rating(""), Ok(None));
        assert!(parse_rating("-1").is_err());
        assert!(parse_rating("seven").is_err());
    }

    #[test]
    fn unpick_clears_the_selection() {
        assert_eq!(parse_command(":unpick"), Ok(BacklogCommand::Unpick));
    }

    #[test]
    fn summary_lists_status_rating_and_score() {
        let entry: BacklogEntry = serde_json::from_str(
            r#"{"id": "b-1", "igdbId": 7, "name": "Hades", "backlogStatus": "COMPLETED",
                "igdbScore": 93, "rating": 9}"#,
        )
        .unwrap();
        assert_eq!(entry_summary(&entry), "Completed, 9/10, critics 93");

        let entry = BacklogEntry { rating: None, igdb_score: None, ..entry };
        assert_eq!(entry_summary(&entry), "Completed");
    }

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            parse_command("hollow knight"),
            Ok(BacklogCommand::Query("hollow knight".to_string()))
        );
    }
}
