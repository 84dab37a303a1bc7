use std::sync::Arc;

use unisearch::session::{FormEvent, RelatedFocus};
use unisearch::settings::{MemorySettingsStore, SearchSettings};
use unisearch::test_utils::doubles::StaticTransport;
use unisearch::test_utils::fixtures::{module, universal};
use unisearch::test_utils::logging::capture_logs;
use unisearch::transport::SearchResult;

use crate::session_with;

fn stored(input: &str) -> Arc<MemorySettingsStore> {
    Arc::new(MemorySettingsStore::with_settings(SearchSettings {
        input: input.to_string(),
        active_vertical: "faqs".to_string(),
        offset: 30,
        limit: Some(10),
    }))
}

#[test]
fn initialize_forces_all_and_drops_limit() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);

    session.initialize();

    let expected = SearchSettings {
        input: "coffee".to_string(),
        active_vertical: "all".to_string(),
        offset: 30,
        limit: None,
    };
    assert_eq!(session.settings(), Some(&expected));
    assert_eq!(store.stored(), Some(expected));
    assert!(session.display_results());
    assert_eq!(session.fetch_generation(), 0);
}

#[test]
fn initialize_runs_once() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);

    session.initialize();
    let saves = store.save_history().len();
    assert!(!session.display_results());

    session.update_input("tea");
    session.initialize();
    assert_eq!(store.save_history().len(), saves);
    assert_eq!(session.settings().map(|s| s.input.as_str()), Some("tea"));
}

#[tokio::test]
async fn submit_replaces_settings_and_fetches() {
    let store = stored("old");
    let transport = Arc::new(
        StaticTransport::new().with_response("all", universal(vec![module("locations", 2)])),
    );
    let mut session = session_with(&store, &transport);
    session.initialize();

    let mut event = FormEvent::submit("coffee");
    session.submit_query(&mut event);

    assert!(event.is_default_prevented());
    assert_eq!(session.settings(), Some(&SearchSettings::with_input("coffee")));
    assert_eq!(store.stored(), Some(SearchSettings::with_input("coffee")));
    assert!(session.display_results());
    assert!(session.active_vertical().is_all());

    session.fetch_settled().await;
    assert_eq!(session.fetch_generation(), 1);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].input, "coffee");
    assert_eq!(requests[0].vertical_key, "all");
    assert_eq!(session.total_count(), Some(2));
}

#[tokio::test]
async fn submit_without_value_keeps_current_input() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.update_input("pizza");

    session.submit_query(&mut FormEvent::new());

    assert_eq!(session.settings().map(|s| s.input.as_str()), Some("pizza"));
    assert!(session.display_results());
}

#[tokio::test]
async fn empty_submit_hides_results() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    assert!(session.display_results());

    session.submit_query(&mut FormEvent::submit(""));

    assert!(!session.display_results());
    assert_eq!(session.fetch_generation(), 1);
}

#[tokio::test]
async fn handlers_before_initialize_are_silent() {
    let store = Arc::new(MemorySettingsStore::new());
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);

    let mut event = FormEvent::submit("coffee");
    session.submit_query(&mut event);
    session.update_input("coffee");
    session.change_page(Some("2"));
    session.select_suggestion(&SearchResult::new("coffee"));
    session.set_active_vertical("faqs");
    session.focus_in();

    assert!(event.is_default_prevented());
    assert!(session.settings().is_none());
    assert_eq!(session.fetch_generation(), 0);
    assert!(transport.requests().is_empty());
    assert!(store.save_history().is_empty());
    assert!(session.active_vertical().is_all());
}

#[tokio::test]
async fn reset_before_initialize_still_fetches() {
    let store = Arc::new(MemorySettingsStore::new());
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);

    let mut event = FormEvent::new();
    session.reset_query(&mut event);

    assert!(event.is_default_prevented());
    assert_eq!(session.settings(), Some(&SearchSettings::default()));
    session.fetch_settled().await;
    assert_eq!(session.fetch_generation(), 1);
}

#[tokio::test]
async fn reset_restores_defaults_with_one_fetch() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.set_active_vertical("faqs");
    let before = session.fetch_generation();

    session.reset_query(&mut FormEvent::new());

    let settings = session.settings().cloned().unwrap_or_default();
    assert_eq!(settings.input, "");
    assert_eq!(settings.active_vertical, "all");
    assert_eq!(store.stored(), Some(SearchSettings::default()));
    assert_eq!(session.fetch_generation(), before + 1);
}

#[tokio::test]
async fn change_page_without_limit_pins_offset_to_zero() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.change_page(Some("3"));

    assert_eq!(session.settings().map(|s| s.offset), Some(0));
    assert_eq!(store.stored().map(|s| s.offset), Some(0));
    assert_eq!(session.fetch_generation(), 1);
}

#[tokio::test]
async fn change_page_ignores_non_numeric_pages() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    for page in [None, Some(""), Some("abc"), Some("NaN")] {
        session.change_page(page);
    }

    assert_eq!(session.fetch_generation(), 0);
    assert_eq!(session.settings().map(|s| s.offset), Some(30));
}

#[tokio::test]
async fn typing_requests_suggestions_without_fetching() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.update_input("caf");
    assert_eq!(session.suggestion_request(), None);

    session.update_input("cafe");
    assert_eq!(session.suggestion_request(), Some("cafe"));
    assert!(!session.provide_suggestions("caf", vec![SearchResult::new("stale")]));
    assert!(session.provide_suggestions("cafe", vec![SearchResult::new("Cafe Downtown")]));
    assert_eq!(session.suggestions().len(), 1);

    session.update_input("cafes");
    assert_eq!(session.suggestions().len(), 1);

    session.update_input("ca");
    assert!(session.suggestions().is_empty());
    assert_eq!(session.suggestion_request(), None);
    assert_eq!(session.fetch_generation(), 0);
}

#[tokio::test]
async fn focus_opens_and_closes_suggestions() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.focus_in();
    assert!(!session.is_focus());

    session.update_input("cafe");
    session.provide_suggestions("cafe", vec![SearchResult::new("Cafe Downtown")]);
    session.focus_in();
    assert!(session.is_focus());

    session.focus_out(RelatedFocus::InsideForm);
    assert!(session.is_focus());
    session.focus_out(RelatedFocus::OutsideForm);
    assert!(!session.is_focus());
}

#[tokio::test]
async fn select_suggestion_fetches_and_clears() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.update_input("coff");
    session.provide_suggestions("coff", vec![SearchResult::new("coffee shop")]);
    session.focus_in();

    session.select_suggestion(&SearchResult::new("coffee shop"));

    assert_eq!(session.settings().map(|s| s.input.as_str()), Some("coffee shop"));
    assert_eq!(store.stored().map(|s| s.input), Some("coffee shop".to_string()));
    assert!(session.suggestions().is_empty());
    assert!(!session.is_focus());
    session.fetch_settled().await;
    assert_eq!(transport.requests()[0].input, "coffee shop");
}

#[tokio::test]
async fn mutations_request_a_render() {
    let store = stored("");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.signal().take();

    session.toggle_dropdown();
    assert!(session.signal().take());
    assert!(!session.signal().take());

    session.update_input("x");
    assert!(session.signal().is_requested());
}

#[tokio::test]
async fn persistence_failures_are_logged_not_raised() {
    let fixture = unisearch::test_utils::fixtures::SettingsFixture::new();
    // A directory where the file should be makes every save fail.
    std::fs::create_dir_all(&fixture.settings_path).unwrap();
    let store = Arc::new(fixture.store());
    let transport = Arc::new(StaticTransport::new());
    let mut session = unisearch::session::SearchSession::new(
        store,
        transport,
        unisearch::session::SessionOptions::default(),
    );

    let ((), logs) = capture_logs(|| session.initialize());

    assert_eq!(session.settings().map(|s| s.input.as_str()), Some(""));
    assert!(logs.has_warnings());
    assert!(logs.contains_message("saving settings failed"));
}

#[test]
fn handlers_outside_a_runtime_persist_without_fetching() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("tea"));
    session.change_page(Some("2"));
    session.set_active_vertical("faqs");
    session.reset_query(&mut FormEvent::new());
    session.sync();

    assert_eq!(session.fetch_generation(), 0);
    assert_eq!(store.stored().map(|s| s.input), Some(String::new()));
}

#[tokio::test]
async fn change_page_uses_the_page_size() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.set_page_size(Some(10));
    assert_eq!(session.fetch_generation(), 0);

    session.change_page(Some("3"));
    session.fetch_settled().await;

    assert_eq!(session.settings().map(|s| s.offset), Some(20));
    assert_eq!(store.stored().map(|s| (s.offset, s.limit)), Some((20, Some(10))));
    assert_eq!(session.fetch_generation(), 1);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!((requests[0].offset, requests[0].limit), (20, Some(10)));
}

#[tokio::test]
async fn change_page_rejects_fractional_and_oversized_pages() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.set_page_size(Some(10));

    for page in ["2.5", "1e12", "-0.5"] {
        session.change_page(Some(page));
    }

    assert_eq!(session.fetch_generation(), 0);
    assert_eq!(session.settings().map(|s| s.offset), Some(30));
}

#[test]
fn page_size_before_initialize_is_ignored() {
    let store = stored("coffee");
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);

    session.set_page_size(Some(10));

    assert!(session.settings().is_none());
    assert!(store.save_history().is_empty());
}
