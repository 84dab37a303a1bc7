//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod highlight;
pub mod search;
pub mod settings;
pub mod tui;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a universal search, optionally narrowed to one vertical
    Search(search::SearchArgs),

    /// Inspect or reset the persisted search settings
    Settings(settings::SettingsArgs),

    /// Highlight query matches inside a piece of text
    Highlight(highlight::HighlightArgs),

    /// Interactive terminal search
    Tui(tui::TuiArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Settings(args) => settings::run(ctx, args),
        Commands::Highlight(args) => highlight::run(ctx, args),
        Commands::Tui(args) => tui::run(ctx, args),
    }
}
