//! unisearch search - Run a query against the backend

use std::sync::Arc;

use clap::Args;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::formatters::format_search_view;
use crate::cli::output::{emit_human, emit_json, robot_ok};
use crate::error::{Result, SearchError};
use crate::session::{FormEvent, Fragment, MainView, SearchSession, SearchView};
use crate::settings::ALL_VERTICALS;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Show the full result list of one vertical instead of the grouped view
    #[arg(long, short = 'k', value_name = "VERTICAL_KEY")]
    pub vertical: Option<String>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let view = runtime.block_on(search(ctx, args))?;

    if let Some(message) = failure(&view) {
        return Err(SearchError::SearchFailed(message.to_string()));
    }

    if ctx.robot_mode {
        emit_json(&robot_ok(&view))
    } else {
        emit_human(format_search_view(&args.query, &view));
        Ok(())
    }
}

async fn search(ctx: &AppContext, args: &SearchArgs) -> Result<SearchView> {
    let store = Arc::new(ctx.settings_store());
    let transport = Arc::new(ctx.transport()?);
    let mut options = ctx.session_options();
    // Failures must reach the exit code, so they are always rendered here.
    options.show_errors = true;

    let mut session = SearchSession::new(store, transport, options);
    session.initialize();
    session.submit_query(&mut FormEvent::submit(args.query.clone()));
    if let Some(size) = session.options().page_size {
        session.set_page_size(Some(size));
    }
    session.fetch_settled().await;

    if let Some(vertical) = args.vertical.as_deref() {
        if vertical != ALL_VERTICALS {
            debug!(vertical, "narrowing to vertical");
            session.set_active_vertical(vertical);
            session.vertical_settled().await;
        }
    }
    Ok(session.render())
}

fn failure(view: &SearchView) -> Option<&str> {
    let fragment_error = match &view.main {
        MainView::All { results } => match results {
            Fragment::Error(message) => Some(message),
            _ => None,
        },
        MainView::Vertical { results, .. } => match results {
            Fragment::Error(message) => Some(message),
            _ => None,
        },
    };
    fragment_error.map(String::as_str)
}
