use std::path::PathBuf;

use serde_json::{Map, Value, json};
use tempfile::TempDir;

use crate::settings::{JsonSettingsStore, SearchSettings, SettingsStore};
use crate::transport::{
    Module, SearchResponse, SearchResult, UniversalSearchResponse, VerticalSearchResponse,
};

/// Isolated directory holding a settings file.
pub struct SettingsFixture {
    pub temp_dir: TempDir,
    pub settings_path: PathBuf,
}

impl Default for SettingsFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let settings_path = temp_dir.path().join("settings.json");
        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());
        Self {
            temp_dir,
            settings_path,
        }
    }

    /// Fixture whose store already holds `settings`.
    #[must_use]
    pub fn with_settings(settings: &SearchSettings) -> Self {
        let fixture = Self::new();
        fixture
            .store()
            .save(settings)
            .expect("Failed to seed settings");
        fixture
    }

    #[must_use]
    pub fn store(&self) -> JsonSettingsStore {
        JsonSettingsStore::new(&self.settings_path)
    }

    /// Write raw text to the settings file.
    pub fn write_raw(&self, content: &str) {
        std::fs::write(&self.settings_path, content).expect("Failed to write settings");
    }
}

/// A result whose `data` carries `name` and optional extra fields.
#[must_use]
pub fn named_result(name: &str, extra: &[(&str, Value)]) -> SearchResult {
    let mut data = Map::new();
    data.insert("name".to_string(), json!(name));
    for (key, value) in extra {
        data.insert((*key).to_string(), value.clone());
    }
    SearchResult {
        value: name.to_string(),
        data,
        highlighted_fields: Map::new(),
    }
}

/// Module for `vertical_id` with `count` generated results.
#[must_use]
pub fn module(vertical_id: &str, count: usize) -> Module {
    Module {
        vertical_config_id: vertical_id.to_string(),
        results_count: count as u64,
        results: (1..=count)
            .map(|idx| named_result(&format!("{vertical_id} {idx}"), &[]))
            .collect(),
    }
}

#[must_use]
pub fn universal(modules: Vec<Module>) -> SearchResponse {
    SearchResponse::Universal(UniversalSearchResponse { modules })
}

#[must_use]
pub fn vertical(vertical_id: &str, count: usize) -> SearchResponse {
    let module = module(vertical_id, count);
    SearchResponse::Vertical(VerticalSearchResponse {
        vertical_config_id: module.vertical_config_id,
        results_count: module.results_count,
        results: module.results,
    })
}
