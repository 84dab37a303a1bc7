//! Wire types returned by the search backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level body returned by the query endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub meta: Option<Value>,
    pub response: SearchResponse,
}

/// Either an aggregated (universal) response or a single-vertical one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Universal(UniversalSearchResponse),
    Vertical(VerticalSearchResponse),
}

impl SearchResponse {
    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        matches!(self, Self::Vertical(_))
    }

    #[must_use]
    pub const fn as_universal(&self) -> Option<&UniversalSearchResponse> {
        match self {
            Self::Universal(universal) => Some(universal),
            Self::Vertical(_) => None,
        }
    }

    #[must_use]
    pub const fn as_vertical(&self) -> Option<&VerticalSearchResponse> {
        match self {
            Self::Vertical(vertical) => Some(vertical),
            Self::Universal(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalSearchResponse {
    pub modules: Vec<Module>,
}

impl UniversalSearchResponse {
    /// Total result count across every module.
    #[must_use]
    pub fn total_results(&self) -> u64 {
        self.modules.iter().map(|module| module.results_count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalSearchResponse {
    pub vertical_config_id: String,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Results for one vertical inside a universal response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub vertical_config_id: String,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A single result; vertical-specific fields stay as raw JSON for teasers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub highlighted_fields: Map<String, Value>,
}

impl SearchResult {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// String field from `data`, if present.
    #[must_use]
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}
