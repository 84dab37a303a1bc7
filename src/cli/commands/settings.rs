//! unisearch settings - Inspect or reset persisted search settings

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::settings::{SearchSettings, SettingsStore};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the stored settings
    Show,
    /// Replace the stored settings with defaults
    Reset,
}

#[derive(Serialize)]
struct SettingsReport<'a> {
    path: String,
    config_path: String,
    settings: &'a SearchSettings,
}

pub fn run(ctx: &AppContext, args: &SettingsArgs) -> Result<()> {
    let store = ctx.settings_store();
    let existed = store.path().exists();
    let settings = match args.command {
        SettingsCommand::Show => store.load()?,
        SettingsCommand::Reset => {
            let defaults = store.defaults();
            store.save(&defaults)?;
            defaults
        }
    };

    if ctx.robot_mode {
        let mut response = robot_ok(SettingsReport {
            path: store.path().display().to_string(),
            config_path: ctx.config_path.display().to_string(),
            settings: &settings,
        });
        if !existed {
            response = response.with_warning("no stored settings; showing defaults");
        }
        return emit_json(&response);
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Search settings")
        .kv("path", &store.path().display().to_string())
        .kv("config", &ctx.config_path.display().to_string())
        .kv("input", &settings.input)
        .kv("vertical", &settings.active_vertical)
        .kv("offset", &settings.offset.to_string())
        .kv(
            "limit",
            &settings
                .limit
                .map_or_else(|| "default".to_string(), |limit| limit.to_string()),
        );
    emit_human(layout);
    Ok(())
}
