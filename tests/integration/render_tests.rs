use std::sync::Arc;
use std::time::Instant;

use unisearch::breakpoint::{FixedBreakpoint, LayoutMode};
use unisearch::session::{
    FormEvent, Fragment, MainView, ResultsView, SearchSession, SessionOptions,
};
use unisearch::settings::{MemorySettingsStore, SearchSettings};
use unisearch::test_utils::doubles::{GatedTransport, StaticTransport};
use unisearch::test_utils::fixtures::{module, universal, vertical};
use unisearch::transport::SearchResult;

use crate::session_with;

fn store() -> Arc<MemorySettingsStore> {
    Arc::new(MemorySettingsStore::with_settings(SearchSettings::with_input("")))
}

fn sections(main: &MainView) -> Vec<(String, usize)> {
    match main {
        MainView::All {
            results: Fragment::Content(ResultsView::Sections { sections }),
        } => sections
            .iter()
            .map(|section| (section.title.clone(), section.results.len()))
            .collect(),
        other => panic!("expected sections, got {other:?}"),
    }
}

#[test]
fn nothing_rendered_before_first_value() {
    let store = store();
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    let view = session.render();

    assert_eq!(view.nav, Fragment::NoChange);
    assert!(matches!(view.main, MainView::All { results: Fragment::NoChange }));
    assert!(view.modal.is_none());
    assert_eq!(view.form.map(|form| form.input), Some(String::new()));
}

#[tokio::test]
async fn universal_response_renders_sections_and_nav() {
    let store = store();
    let transport = Arc::new(StaticTransport::new().with_response(
        "all",
        universal(vec![module("locationsearch", 5), module("help_articles", 1)]),
    ));
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.submit_query(&mut FormEvent::submit("coffee"));
    session.fetch_settled().await;

    let view = session.render();

    assert!(view.is_visible);
    assert_eq!(
        sections(&view.main),
        vec![("Location".to_string(), 3), ("Help Articles".to_string(), 1)]
    );
    let nav = view.nav.content().cloned().unwrap();
    assert_eq!(nav.heading, "Refine Your Search");
    let ids: Vec<&str> = nav.entries.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["all", "locationsearch", "help_articles"]);
    assert!(nav.entries[0].active);
    assert_eq!(nav.current_title, "All");
}

#[tokio::test]
async fn empty_modules_render_no_results() {
    let store = store();
    let transport = Arc::new(StaticTransport::new().with_response("all", universal(Vec::new())));
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.submit_query(&mut FormEvent::submit("zzzz"));
    session.fetch_settled().await;

    let view = session.render();

    assert_eq!(view.nav, Fragment::Empty);
    match view.main {
        MainView::All {
            results: Fragment::Content(ResultsView::NoResults { heading, .. }),
        } => assert!(heading.starts_with("Sorry")),
        other => panic!("expected no-results message, got {other:?}"),
    }
}

#[tokio::test]
async fn pending_shown_only_after_a_prior_value() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("first"));
    assert!(matches!(
        session.render().main,
        MainView::All { results: Fragment::NoChange }
    ));

    transport.resolve(0, Ok(universal(vec![module("faqs", 1)])));
    session.fetch_settled().await;

    session.submit_query(&mut FormEvent::submit("second"));
    let view = session.render();
    assert!(matches!(view.main, MainView::All { results: Fragment::Pending }));
    assert_eq!(view.nav, Fragment::Pending);
}

#[tokio::test]
async fn transport_errors_follow_show_errors() {
    for (show_errors, expect_message) in [(false, false), (true, true)] {
        let store = store();
        let transport = Arc::new(StaticTransport::failing(503, "down"));
        let options = SessionOptions {
            show_errors,
            ..SessionOptions::default()
        };
        let mut session = SearchSession::new(Arc::clone(&store), Arc::clone(&transport), options);
        session.initialize();
        session.submit_query(&mut FormEvent::submit("coffee"));
        session.fetch_settled().await;

        match session.render().main {
            MainView::All {
                results: Fragment::Error(message),
            } => {
                assert!(expect_message);
                assert_eq!(message, "backend returned 503: down");
            }
            MainView::All {
                results: Fragment::Empty,
            } => assert!(!expect_message),
            other => panic!("unexpected main view {other:?}"),
        }
    }
}

#[tokio::test]
async fn vertical_selection_renders_child_results() {
    let store = store();
    let transport = Arc::new(
        StaticTransport::new()
            .with_response("all", universal(vec![module("faqs", 2)]))
            .with_response("faqs", vertical("faqs", 4)),
    );
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.submit_query(&mut FormEvent::submit("hours"));
    session.fetch_settled().await;

    session.set_active_vertical("faqs");
    session.vertical_settled().await;

    match session.render().main {
        MainView::Vertical { key, results } => {
            assert_eq!(key, "faqs");
            let results = results.content().cloned().unwrap();
            assert_eq!(results.title, "Faqs");
            assert_eq!(results.results_count, 4);
            assert_eq!(results.results.len(), 4);
        }
        other => panic!("expected vertical view, got {other:?}"),
    }
    let vertical_request = transport.requests().pop().unwrap();
    assert_eq!(vertical_request.vertical_key, "faqs");
    assert_eq!(vertical_request.input, "hours");
}

#[tokio::test]
async fn suggestions_are_highlighted() {
    let store = store();
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.update_input("cafe");
    session.provide_suggestions("cafe", vec![SearchResult::new("Cafe Downtown")]);
    session.focus_in();

    let form = session.render().form.unwrap();

    assert!(form.suggestions_open);
    assert_eq!(
        form.suggestions[0].markup,
        r#"<span class="suggestion-highlight">Cafe</span> Downtown"#
    );
    assert!(form.suggestions[0].segments[0].highlighted);
}

#[tokio::test]
async fn mobile_layout_and_modal_count() {
    let store = store();
    let transport = Arc::new(
        StaticTransport::new()
            .with_response("all", universal(vec![module("faqs", 2), module("locations", 3)])),
    );
    let mut session = session_with(&store, &transport).with_breakpoints(Arc::new(FixedBreakpoint(0)));
    session.initialize();
    session.submit_query(&mut FormEvent::submit("coffee"));
    session.fetch_settled().await;

    session.toggle_filter_modal(Instant::now());
    let view = session.render();

    assert_eq!(view.layout, LayoutMode::Mobile);
    assert_eq!(view.form.map(|form| form.layout_class), Some("is-mobile"));
    let modal = view.modal.unwrap();
    assert_eq!(modal.show_results_label, "Show 5 results");
    assert_eq!(modal.reset_label, "Clear");

    session.toggle_filter_modal(Instant::now());
    assert!(session.render().modal.is_none());
}
