use std::sync::Arc;
use std::time::{Duration, Instant};

use unisearch::breakpoint::FixedBreakpoint;
use unisearch::modal::{ControlId, KeyOutcome, KeyPress, ScrollFlag};
use unisearch::session::controls::{CLOSE_MODAL, CLOSE_MODAL_MOBILE, DROPDOWN, OPEN_MODAL, RESET};
use unisearch::session::{FormEvent, SearchSession};
use unisearch::settings::{MemorySettingsStore, SearchSettings};
use unisearch::test_utils::doubles::StaticTransport;
use unisearch::test_utils::fixtures::{module, universal};

use crate::session_with;

fn mobile_session(
    flag: &ScrollFlag,
) -> SearchSession<MemorySettingsStore, StaticTransport> {
    let store = Arc::new(MemorySettingsStore::with_settings(SearchSettings::with_input("")));
    let transport = Arc::new(
        StaticTransport::new()
            .with_response("all", universal(vec![module("faqs", 1), module("locations", 2)])),
    );
    let mut session = session_with(&store, &transport)
        .with_breakpoints(Arc::new(FixedBreakpoint(0)))
        .with_scroll_lock(Box::new(flag.clone()));
    session.initialize();
    session
}

fn id(name: &str) -> ControlId {
    ControlId::from(name)
}

#[tokio::test]
async fn opening_locks_scroll_and_traps_focus() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);

    assert_eq!(session.toggle_filter_modal(Instant::now()), None);

    assert!(flag.is_locked());
    assert!(session.modal().is_open());
    assert!(session.modal().is_listening());
    let controls = session.modal().controls();
    assert_eq!(controls.first(), Some(&id(CLOSE_MODAL)));
    assert_eq!(controls.last(), Some(&id(CLOSE_MODAL_MOBILE)));
    assert_eq!(
        controls,
        &[id(CLOSE_MODAL), id(DROPDOWN), id(RESET), id(CLOSE_MODAL_MOBILE)]
    );
}

#[tokio::test]
async fn close_control_is_focused_after_the_delay() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);
    let opened = Instant::now();
    session.toggle_filter_modal(opened);

    assert_eq!(session.tick(opened + Duration::from_millis(100)), None);
    assert_eq!(
        session.tick(opened + Duration::from_millis(300)),
        Some(id(CLOSE_MODAL))
    );
    assert_eq!(session.tick(opened + Duration::from_millis(600)), None);
}

#[tokio::test]
async fn reopening_within_the_delay_reschedules_focus() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);
    let start = Instant::now();

    session.toggle_filter_modal(start);
    session.toggle_filter_modal(start + Duration::from_millis(100));
    let reopened = start + Duration::from_millis(200);
    session.toggle_filter_modal(reopened);

    assert_eq!(session.tick(start + Duration::from_millis(350)), None);
    assert_eq!(
        session.tick(reopened + Duration::from_millis(300)),
        Some(id(CLOSE_MODAL))
    );
}

#[tokio::test]
async fn tab_wraps_at_both_ends() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);
    session.toggle_filter_modal(Instant::now());

    assert_eq!(
        session.modal_key(KeyPress::tab(), Some(&id(CLOSE_MODAL_MOBILE))),
        KeyOutcome::MoveFocus(id(CLOSE_MODAL))
    );
    assert_eq!(
        session.modal_key(KeyPress::shift_tab(), Some(&id(CLOSE_MODAL))),
        KeyOutcome::MoveFocus(id(CLOSE_MODAL_MOBILE))
    );
    assert_eq!(
        session.modal_key(KeyPress::tab(), Some(&id(DROPDOWN))),
        KeyOutcome::Default
    );
    assert_eq!(
        session.modal_key(KeyPress::shift_tab(), Some(&id(CLOSE_MODAL_MOBILE))),
        KeyOutcome::Default
    );
}

#[tokio::test]
async fn closing_restores_focus_and_scroll() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);
    let opened = Instant::now();
    session.toggle_filter_modal(opened);

    assert_eq!(session.toggle_filter_modal(opened), Some(id(OPEN_MODAL)));

    assert!(!flag.is_locked());
    assert!(!session.modal().is_listening());
    assert_eq!(session.tick(opened + Duration::from_secs(1)), None);
    assert_eq!(
        session.modal_key(KeyPress::tab(), Some(&id(CLOSE_MODAL_MOBILE))),
        KeyOutcome::Default
    );
}

#[tokio::test]
async fn open_dropdown_adds_nav_controls() {
    let flag = ScrollFlag::new();
    let mut session = mobile_session(&flag);
    session.submit_query(&mut FormEvent::submit("coffee"));
    session.fetch_settled().await;
    session.toggle_filter_modal(Instant::now());

    session.toggle_dropdown();

    let names: Vec<&str> = session.modal().controls().iter().map(ControlId::as_str).collect();
    assert_eq!(
        names,
        vec![
            CLOSE_MODAL,
            DROPDOWN,
            "nav:all",
            "nav:faqs",
            "nav:locations",
            RESET,
            CLOSE_MODAL_MOBILE
        ]
    );
}
