//! Interactive terminal front end.
//!
//! Drives a [`SearchSession`] from keyboard events and renders its view model
//! with ratatui. Terminal width feeds the breakpoint observer, so narrow
//! terminals get the mobile layout with the filters modal.

pub mod app;
pub mod ui;

use std::sync::Arc;

use tracing::info;

use crate::app::AppContext;
use crate::breakpoint::WidthBreakpoints;
use crate::error::Result;
use crate::modal::ScrollFlag;
use crate::session::SearchSession;

pub use app::SearchTui;

pub fn run_search_tui(ctx: &AppContext, query: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    // Fetches are spawned from the UI thread.
    let _guard = runtime.enter();

    let store = Arc::new(ctx.settings_store());
    let transport = Arc::new(ctx.transport()?);
    let (width, _) = crossterm::terminal::size()?;
    let breakpoints = Arc::new(WidthBreakpoints::new(
        vec![ctx.config.session.mobile_breakpoint],
        width,
    ));
    let scroll = ScrollFlag::new();

    let session = SearchSession::new(store, transport, ctx.session_options())
        .with_breakpoints(breakpoints.clone())
        .with_scroll_lock(Box::new(scroll.clone()));
    let mut app = SearchTui::new(session, breakpoints, scroll, ctx.config.display.show_results);

    info!(width, "starting terminal ui");
    let mut terminal = ratatui::init();
    app.start(query);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
