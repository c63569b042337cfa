//! Interactive add/edit form.
//!
//! Every stdin line is one input event. A plain line is the title field's new
//! text (as if typed); lines starting with `:` are commands. Catalog results
//! and prefills are printed as they arrive, so a search can complete while
//! the user is still typing the next line.

use std::rc::Rc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::io::{AsyncBufReadExt, BufReader};

use release_radar_core::{EntryId, Platform};
use release_radar_lib::{
    EntryForm, FormMode, FormPhase, FormUpdate, PrefillState, ReleaseInput, SubmitError,
};
use release_radar_lookup::{CatalogSource, EntryStore};

use super::{catalog, format_platforms, load_settings, print_field, print_results, runtime, tracker};
use crate::{CliError, spinner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormCommand {
    Title(String),
    /// Zero-based index into the visible results.
    Pick(usize),
    Date(String),
    Tba(String),
    TogglePlatform(Platform),
    Developer(String),
    Publisher(String),
    Description(String),
    ShopUrl(String),
    ImageUrl(String),
    CloseDropdown,
    Show,
    Submit,
    Quit,
    Help,
}

pub(crate) fn parse_command(line: &str) -> Result<FormCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(FormCommand::Title(line.to_string()));
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "pick" | "p" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(FormCommand::Pick(n - 1)),
            _ => Err(format!("Usage: :pick N (a result number), got '{}'", arg)),
        },
        "date" => Ok(FormCommand::Date(arg.to_string())),
        "tba" => Ok(FormCommand::Tba(arg.to_string())),
        "platform" => arg
            .parse::<Platform>()
            .map(FormCommand::TogglePlatform)
            .map_err(|e| e.to_string()),
        "dev" => Ok(FormCommand::Developer(arg.to_string())),
        "pub" => Ok(FormCommand::Publisher(arg.to_string())),
        "desc" => Ok(FormCommand::Description(arg.to_string())),
        "shop" => Ok(FormCommand::ShopUrl(arg.to_string())),
        "image" => Ok(FormCommand::ImageUrl(arg.to_string())),
        "close" => Ok(FormCommand::CloseDropdown),
        "show" => Ok(FormCommand::Show),
        "submit" | "save" => Ok(FormCommand::Submit),
        "quit" | "q" => Ok(FormCommand::Quit),
        "help" | "h" | "?" => Ok(FormCommand::Help),
        other => Err(format!("Unknown command ':{}' (try :help)", other)),
    }
}

/// `release-radar add`
pub(crate) fn run_add() -> Result<(), CliError> {
    let settings = load_settings()?;
    let catalog = Rc::new(catalog(&settings)?);
    let store = Rc::new(tracker(&settings)?);
    let rt = runtime()?;

    log::info!("{}", "New game".if_supports_color(Stdout, |t| t.bold()));
    print_help();
    let form = EntryForm::new(catalog, store, settings.debounce_gate());
    rt.block_on(drive(form))
}

/// `release-radar edit <id>`
pub(crate) fn run_edit(id: &EntryId, quiet: bool) -> Result<(), CliError> {
    let settings = load_settings()?;
    let catalog = Rc::new(catalog(&settings)?);
    let store = Rc::new(tracker(&settings)?);
    let rt = runtime()?;

    rt.block_on(async {
        let pb = spinner::start(quiet, format!("Loading entry {}...", id));
        let entry = store.get_entry(id).await;
        pb.finish_and_clear();
        let entry = entry?;

        log::info!(
            "{} {}",
            "Editing".if_supports_color(Stdout, |t| t.bold()),
            entry.title.if_supports_color(Stdout, |t| t.cyan()),
        );
        let form = EntryForm::edit(catalog, store, settings.debounce_gate(), &entry);
        print_draft(&form);
        print_help();
        drive(form).await
    })
}

async fn drive<C, S>(mut form: EntryForm<C, S>) -> Result<(), CliError>
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = form.next_update(), if form.has_pending() => {
                if let Some(update) = update {
                    if report(&mut form, update) {
                        return Ok(());
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // End of input: let outstanding work (e.g. a submission) finish.
                    for update in form.settle().await {
                        if report(&mut form, update) {
                            return Ok(());
                        }
                    }
                    break;
                };
                match parse_command(&line) {
                    Ok(FormCommand::Quit) => break,
                    Ok(command) => apply(&mut form, command),
                    Err(msg) => log::warn!("{}", msg),
                }
            }
        }
    }

    if form.phase() != FormPhase::Closed {
        form.close();
        log::info!("{}", "Draft discarded.".if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

fn apply<C, S>(form: &mut EntryForm<C, S>, command: FormCommand)
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    match command {
        FormCommand::Title(text) => {
            form.on_text_changed(&text);
        }
        FormCommand::Pick(index) => match form.select(index) {
            Some(id) => log::info!(
                "  {}",
                format!("Fetching details for #{}...", id).if_supports_color(Stdout, |t| t.dimmed())
            ),
            None => log::warn!("No result #{} to pick", index + 1),
        },
        FormCommand::Date(date) => form.draft_mut().set_release_date(date),
        FormCommand::Tba(year) => form.draft_mut().set_release_year(year),
        FormCommand::TogglePlatform(platform) => {
            form.draft_mut().toggle_platform(platform);
            print_field("Platforms", Some(&format_platforms(&form.draft().platforms)));
        }
        FormCommand::Developer(v) => form.draft_mut().developer = v,
        FormCommand::Publisher(v) => form.draft_mut().publisher = v,
        FormCommand::Description(v) => form.draft_mut().description = v,
        FormCommand::ShopUrl(v) => form.draft_mut().shop_url = v,
        FormCommand::ImageUrl(v) => form.draft_mut().image_url = v,
        FormCommand::CloseDropdown => form.close_dropdown(),
        FormCommand::Show => print_draft(form),
        FormCommand::Submit => match form.submit() {
            Ok(()) => log::info!("  {}", "Saving...".if_supports_color(Stdout, |t| t.dimmed())),
            Err(SubmitError::Invalid(errors)) => {
                log::warn!("Cannot save yet:");
                for (field, message) in errors.iter() {
                    log::warn!("  {}: {}", field, message);
                }
            }
            Err(e) => log::warn!("{}", e),
        },
        FormCommand::Help => print_help(),
        FormCommand::Quit => {}
    }
}

/// Print one update. Returns `true` once the form is done.
fn report<C, S>(form: &mut EntryForm<C, S>, update: FormUpdate) -> bool
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    match update {
        FormUpdate::SearchStarted { query } => {
            log::debug!("searching catalog for {:?}", query);
        }
        FormUpdate::ResultsShown { query, .. } => {
            log::info!(
                "Matches for {}:",
                format!("\"{}\"", query).if_supports_color(Stdout, |t| t.cyan())
            );
            print_results(form.results());
            if !form.results().is_empty() {
                log::info!("  {}", ":pick N to prefill".if_supports_color(Stdout, |t| t.dimmed()));
            }
        }
        FormUpdate::ResultsCleared | FormUpdate::Discarded => {}
        FormUpdate::Prefilled {
            catalog_id,
            rewritten_title,
        } => {
            echo_title(form, rewritten_title);
            log::info!(
                "{} Prefilled from catalog #{}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                catalog_id,
            );
            print_draft(form);
        }
        FormUpdate::PrefillFellBack {
            catalog_id,
            rewritten_title,
        } => {
            echo_title(form, rewritten_title);
            log::info!(
                "{} Prefilled from search result #{} (catalog details unavailable)",
                "~".if_supports_color(Stdout, |t| t.yellow()),
                catalog_id,
            );
            print_draft(form);
        }
        FormUpdate::Submitted(entry) => {
            let verb = match form.mode() {
                FormMode::Create => "Added",
                FormMode::Edit(_) => "Updated",
            };
            log::info!(
                "{} {} {} ({}, {})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                verb,
                entry.title.if_supports_color(Stdout, |t| t.bold()),
                entry.release(),
                entry.status,
            );
            return true;
        }
        FormUpdate::SubmitFailed { message } => {
            log::warn!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                message
            );
        }
    }
    false
}

/// A terminal has no title widget to rewrite, so show the new title and feed
/// it back through the change handler the way a bound input would.
fn echo_title<C, S>(form: &mut EntryForm<C, S>, rewritten: Option<String>)
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    if let Some(title) = rewritten {
        log::info!("  Title -> {}", title.if_supports_color(Stdout, |t| t.bold()));
        form.on_text_changed(&title);
    }
}

fn print_draft<C, S>(form: &EntryForm<C, S>)
where
    C: CatalogSource + 'static,
    S: EntryStore + 'static,
{
    let draft = form.draft();
    let release = match &draft.release {
        ReleaseInput::Date(date) => date.clone(),
        ReleaseInput::Tba { year } if year.is_empty() => "TBA (year not set)".to_string(),
        ReleaseInput::Tba { year } => format!("TBA {}", year),
    };
    let badge = match form.prefill_state() {
        PrefillState::NotStarted => None,
        PrefillState::Fetching(id) => Some(format!("fetching #{}...", id)),
        PrefillState::Succeeded(id) => Some(format!("prefilled from #{}", id)),
        PrefillState::FailedFallback(id) => Some(format!("prefilled from search result #{}", id)),
    };
    let catalog_id = draft.catalog_id.map(|id| id.to_string());

    print_field("Title", Some(draft.title()));
    print_field("Release", Some(&release));
    print_field("Platforms", Some(&format_platforms(&draft.platforms)));
    print_field("Developer", Some(&draft.developer));
    print_field("Publisher", Some(&draft.publisher));
    print_field("Shop URL", Some(&draft.shop_url));
    print_field("Image URL", Some(&draft.image_url));
    print_field("Description", Some(&draft.description));
    print_field("Catalog id", catalog_id.as_deref());
    print_field("Prefill", badge.as_deref());
}

fn print_help() {
    let lines = [
        ("<text>", "set the title (searches the catalog as you go)"),
        (":pick N", "prefill from result N"),
        (":date YYYY-MM-DD", "exact release date"),
        (":tba YEAR", "release date to be announced"),
        (":platform P", "toggle a platform (pc, ps5, xbox, switch)"),
        (":dev / :pub / :desc", "developer, publisher, description"),
        (":shop / :image URL", "store page, cover image"),
        (":close", "hide the results"),
        (":show", "print the draft"),
        (":submit", "save"),
        (":quit", "discard and exit"),
    ];
    for (command, help) in lines {
        log::info!(
            "  {:<22} {}",
            command.if_supports_color(Stdout, |t| t.cyan()),
            help.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
