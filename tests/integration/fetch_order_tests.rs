use std::sync::Arc;

use unisearch::SearchError;
use unisearch::session::FormEvent;
use unisearch::settings::{MemorySettingsStore, SearchSettings};
use unisearch::task::TaskStatus;
use unisearch::test_utils::doubles::{GatedTransport, StaticTransport};
use unisearch::test_utils::fixtures::{module, universal};
use unisearch::transport::SearchResponse;

use crate::{drain, session_with};

fn store() -> Arc<MemorySettingsStore> {
    Arc::new(MemorySettingsStore::with_settings(SearchSettings::with_input("")))
}

fn first_module_id(status: &TaskStatus<Arc<SearchResponse>, SearchError>) -> Option<String> {
    status
        .complete()
        .and_then(|response| response.as_universal())
        .and_then(|universal| universal.modules.first())
        .map(|module| module.vertical_config_id.clone())
}

#[tokio::test]
async fn late_stale_response_is_discarded() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("first"));
    session.submit_query(&mut FormEvent::submit("second"));
    assert_eq!(transport.request_count(), 2);

    transport.resolve(1, Ok(universal(vec![module("second", 1)])));
    session.fetch_settled().await;
    transport.resolve(0, Ok(universal(vec![module("first", 1)])));
    drain().await;

    assert_eq!(first_module_id(&session.fetch_status()).as_deref(), Some("second"));
    assert_eq!(session.fetch_generation(), 2);
}

#[tokio::test]
async fn early_stale_response_never_surfaces() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("first"));
    session.submit_query(&mut FormEvent::submit("second"));

    transport.resolve(0, Ok(universal(vec![module("first", 1)])));
    drain().await;
    assert!(matches!(session.fetch_status(), TaskStatus::Pending));
    assert_eq!(session.total_count(), None);

    transport.resolve(1, Ok(universal(vec![module("second", 4)])));
    session.fetch_settled().await;
    assert_eq!(first_module_id(&session.fetch_status()).as_deref(), Some("second"));
    assert_eq!(session.total_count(), Some(4));
}

#[tokio::test]
async fn stale_error_is_ignored() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("first"));
    session.submit_query(&mut FormEvent::submit("second"));

    transport.resolve(1, Ok(universal(vec![module("second", 1)])));
    session.fetch_settled().await;
    transport.resolve(
        0,
        Err(SearchError::Backend {
            status: 500,
            message: "boom".to_string(),
        }),
    );
    drain().await;

    assert!(matches!(session.fetch_status(), TaskStatus::Complete(_)));
}

#[tokio::test]
async fn latest_error_replaces_state_but_keeps_last_value() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.submit_query(&mut FormEvent::submit("first"));
    transport.resolve(0, Ok(universal(vec![module("first", 2)])));
    session.fetch_settled().await;

    session.submit_query(&mut FormEvent::submit("second"));
    transport.resolve(1, Err(SearchError::SearchFailed("connection reset".to_string())));
    session.fetch_settled().await;

    assert!(matches!(session.fetch_status(), TaskStatus::Error(_)));
    assert_eq!(session.total_count(), Some(2));
}

#[tokio::test]
async fn sync_runs_on_first_call_and_on_entity_change() {
    let store = store();
    let transport = Arc::new(StaticTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();

    session.sync();
    assert_eq!(session.fetch_generation(), 1);
    session.sync();
    assert_eq!(session.fetch_generation(), 1);

    session.set_displayed_entities(Some(vec!["node:1".to_string()]));
    session.sync();
    assert_eq!(session.fetch_generation(), 2);

    session.set_displayed_entities(Some(vec!["node:1".to_string()]));
    session.sync();
    assert_eq!(session.fetch_generation(), 2);

    session.fetch_settled().await;
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn dropping_the_session_abandons_the_fetch() {
    let store = store();
    let transport = Arc::new(GatedTransport::new());
    let mut session = session_with(&store, &transport);
    session.initialize();
    session.submit_query(&mut FormEvent::submit("coffee"));
    let signal = session.signal().clone();

    drop(session);
    drain().await;
    signal.take();
    transport.resolve(0, Ok(universal(vec![module("faqs", 1)])));
    drain().await;

    assert!(!signal.is_requested());
}
