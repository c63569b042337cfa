//! release-radar CLI
//!
//! Command-line front end for the release tracker: catalog search, the
//! assisted add/edit form, the backlog add flow, and settings.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;

use release_radar_lib::BacklogEdit;

use cli_types::{BacklogAction, Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Search { query } => commands::search::run_search(&query, quiet),
        Commands::Detail { id } => commands::search::run_detail(id, quiet),
        Commands::Add => commands::add::run_add(),
        Commands::Edit { id } => commands::add::run_edit(&id, quiet),
        Commands::Backlog { action } => match action {
            BacklogAction::Add { query } => commands::backlog::run_backlog_add(query),
            BacklogAction::List { status } => commands::backlog::run_backlog_list(status, quiet),
            BacklogAction::Status { id, status } => {
                commands::backlog::run_backlog_edit(&id, BacklogEdit::Status(status), quiet)
            }
            BacklogAction::Rate { id, rating } => commands::backlog::parse_rating(&rating)
                .map_err(CliError::config)
                .and_then(|r| commands::backlog::run_backlog_edit(&id, BacklogEdit::Rating(r), quiet)),
            BacklogAction::Notes { id, text } => commands::backlog::run_backlog_edit(
                &id,
                BacklogEdit::Notes(text.unwrap_or_default()),
                quiet,
            ),
            BacklogAction::Remove { id } => commands::backlog::run_backlog_remove(&id, quiet),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Set { key, value } => commands::config::run_config_set(&key, &value),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Plain-message logger: `info` is normal output, `--quiet` keeps warnings
/// and errors, `-v` adds debug messages with their target. `RUST_LOG`
/// overrides both.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if verbose {
                writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .init();
}
