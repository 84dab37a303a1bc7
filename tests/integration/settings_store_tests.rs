use std::sync::Arc;

use serde_json::Value;

use unisearch::session::{FormEvent, SearchSession, SessionOptions};
use unisearch::settings::{SearchSettings, SettingsStore};
use unisearch::test_utils::doubles::StaticTransport;
use unisearch::test_utils::fixtures::SettingsFixture;

fn sample() -> SearchSettings {
    SearchSettings {
        input: "coffee".to_string(),
        active_vertical: "locations".to_string(),
        offset: 10,
        limit: Some(5),
    }
}

#[test]
fn saved_settings_load_back() {
    let fixture = SettingsFixture::with_settings(&sample());
    assert_eq!(fixture.store().load().unwrap(), sample());
}

#[test]
fn record_uses_camel_case_keys() {
    let fixture = SettingsFixture::with_settings(&sample());
    let raw = std::fs::read_to_string(&fixture.settings_path).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["activeVertical"], "locations");
    assert_eq!(json["offset"], 10);
    assert!(json.get("active_vertical").is_none());
}

#[test]
fn corrupt_record_fails_load_and_sync_repairs_it() {
    let fixture = SettingsFixture::new();
    fixture.write_raw("{not json");
    let store = fixture.store();

    assert!(store.load().is_err());
    store.sync().unwrap();
    assert_eq!(store.load().unwrap(), SearchSettings::default());
}

#[test]
fn empty_file_loads_defaults() {
    let fixture = SettingsFixture::new();
    fixture.write_raw("   \n");
    assert_eq!(fixture.store().load().unwrap(), SearchSettings::default());
}

#[tokio::test]
async fn session_state_survives_a_restart() {
    let fixture = SettingsFixture::new();
    let transport = Arc::new(StaticTransport::new());

    {
        let mut session = SearchSession::new(
            Arc::new(fixture.store()),
            Arc::clone(&transport),
            SessionOptions::default(),
        );
        session.initialize();
        session.submit_query(&mut FormEvent::submit("late night pizza"));
        session.set_active_vertical("locations");
        session.fetch_settled().await;
    }

    let mut session = SearchSession::new(
        Arc::new(fixture.store()),
        Arc::clone(&transport),
        SessionOptions::default(),
    );
    session.initialize();

    let settings = session.settings().cloned().unwrap_or_default();
    assert_eq!(settings.input, "late night pizza");
    // A fresh session always starts on the aggregate view.
    assert_eq!(settings.active_vertical, "all");
    assert!(session.display_results());
}
