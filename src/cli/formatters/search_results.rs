//! Search results formatter
//!
//! Turns a rendered [`SearchView`] into human-readable lines. Robot mode
//! serializes the view itself.

use tracing::debug;

use crate::cli::output::HumanLayout;
use crate::session::{Fragment, MainView, NavView, ResultsView, SearchView, VerticalResultsView};

/// Lay out `view` for the terminal. `query` heads the output.
#[must_use]
pub fn format_search_view(query: &str, view: &SearchView) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&format!("Results for \"{query}\""));

    if let Fragment::Content(nav) = &view.nav {
        format_nav(&mut layout, nav);
    }

    match &view.main {
        MainView::All { results } => format_fragment(&mut layout, results, format_universal),
        MainView::Vertical { results, .. } => {
            format_fragment(&mut layout, results, format_vertical);
        }
    }
    layout
}

fn format_fragment<T>(
    layout: &mut HumanLayout,
    fragment: &Fragment<T>,
    content: fn(&mut HumanLayout, &T),
) {
    match fragment {
        Fragment::Content(value) => content(layout, value),
        Fragment::Pending => {
            layout.note("Loading...");
        }
        Fragment::Error(message) => {
            layout.note(&format!("Search failed: {message}"));
        }
        Fragment::NoChange | Fragment::Empty => {
            debug!("nothing to print for results fragment");
        }
    }
}

fn format_nav(layout: &mut HumanLayout, nav: &NavView) {
    let entries: Vec<String> = nav
        .entries
        .iter()
        .map(|entry| {
            if entry.active {
                format!("[{}]", entry.title)
            } else {
                entry.title.clone()
            }
        })
        .collect();
    layout.kv(nav.heading, &entries.join(" | ")).blank();
}

fn format_universal(layout: &mut HumanLayout, results: &ResultsView) {
    match results {
        ResultsView::NoResults { heading, copy } => {
            layout.section(heading).push_line(*copy);
        }
        ResultsView::Sections { sections } => {
            for section in sections {
                layout.section(&section.title);
                for teaser in &section.results {
                    layout.teaser(teaser);
                }
                layout
                    .note(&format!("View all: --vertical {}", section.vertical_id))
                    .blank();
            }
        }
    }
}

fn format_vertical(layout: &mut HumanLayout, results: &VerticalResultsView) {
    layout.section(&format!("{} ({})", results.title, results.results_count));
    if results.results.is_empty() {
        layout.note("No results in this vertical.");
    }
    for teaser in &results.results {
        layout.teaser(teaser);
    }
}
