//! CLI type definitions: command enums and argument structs.

use clap::{Parser, Subcommand};

use release_radar_core::{BacklogStatus, CatalogId, EntryId};

#[derive(Parser)]
#[command(name = "release-radar")]
#[command(about = "Track upcoming game releases and your backlog", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Search the game catalog by title
    Search {
        /// Title to search for
        query: String,
    },

    /// Show the catalog detail record for one game
    Detail {
        /// Catalog (IGDB) id
        id: CatalogId,
    },

    /// Add a tracked game with catalog-assisted entry
    Add,

    /// Edit a tracked game
    Edit {
        /// Entry id
        id: EntryId,
    },

    /// Manage the play backlog
    Backlog {
        #[command(subcommand)]
        action: BacklogAction,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum BacklogAction {
    /// Search the catalog and add a game to the backlog
    Add {
        /// Start with this search text
        query: Option<String>,
    },

    /// List backlog entries
    List {
        /// Only entries with this status (want, playing, completed, dropped)
        #[arg(long)]
        status: Option<BacklogStatus>,
    },

    /// Change the status of a backlog entry
    Status {
        /// Backlog entry id
        id: String,
        /// New status (want, playing, completed, dropped)
        status: BacklogStatus,
    },

    /// Rate a backlog entry from 1 to 10 ("none" clears the rating)
    Rate {
        /// Backlog entry id
        id: String,
        /// Rating, or "none"
        rating: String,
    },

    /// Replace the notes of a backlog entry (omit TEXT to clear them)
    Notes {
        /// Backlog entry id
        id: String,
        /// New notes
        text: Option<String>,
    },

    /// Remove an entry from the backlog
    Remove {
        /// Backlog entry id
        id: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Set a value in the settings file (empty value removes it)
    Set {
        /// Setting key, e.g. backend.base_url
        key: String,
        /// New value
        value: String,
    },
}
