//! Persisted search settings and the store adapters that hold them.

mod storage;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use storage::JsonSettingsStore;

/// Sentinel vertical id meaning "no vertical filter".
pub const ALL_VERTICALS: &str = "all";

/// The user's current query, filter and pagination intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSettings {
    #[serde(default)]
    pub input: String,
    #[serde(default = "default_vertical")]
    pub active_vertical: String,
    /// Pagination offset, a multiple of `limit` when a limit is set.
    #[serde(default)]
    pub offset: u32,
    /// Page size; `None` shows the backend's default count.
    #[serde(default)]
    pub limit: Option<u32>,
}

fn default_vertical() -> String {
    ALL_VERTICALS.to_string()
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            input: String::new(),
            active_vertical: default_vertical(),
            offset: 0,
            limit: None,
        }
    }
}

impl SearchSettings {
    /// Defaults carrying only the given keyword text.
    #[must_use]
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Offset for a 1-based page number. A missing limit pins the offset to 0.
    #[must_use]
    pub fn offset_for_page(&self, page: u32) -> u32 {
        page.saturating_sub(1)
            .saturating_mul(self.limit.unwrap_or(0))
    }
}

/// Load/save adapter for [`SearchSettings`].
///
/// The session controller only uses it as a back-reference; during a session
/// the controller's copy is authoritative.
pub trait SettingsStore: Send + Sync {
    /// Read the persisted record, falling back to defaults when none exists.
    fn load(&self) -> Result<SearchSettings>;

    fn save(&self, settings: &SearchSettings) -> Result<()>;

    fn defaults(&self) -> SearchSettings {
        SearchSettings::default()
    }

    /// Make sure a well-formed record is persisted.
    fn sync(&self) -> Result<()> {
        let current = self.load()?;
        self.save(&current)
    }
}

/// Settings held in memory; used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    stored: Mutex<Option<SearchSettings>>,
    saves: Mutex<Vec<SearchSettings>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            stored: Mutex::new(Some(settings)),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Current persisted record, if any.
    #[must_use]
    pub fn stored(&self) -> Option<SearchSettings> {
        self.stored.lock().clone()
    }

    /// Every record passed to `save`, oldest first.
    #[must_use]
    pub fn save_history(&self) -> Vec<SearchSettings> {
        self.saves.lock().clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<SearchSettings> {
        Ok(self.stored.lock().clone().unwrap_or_default())
    }

    fn save(&self, settings: &SearchSettings) -> Result<()> {
        *self.stored.lock() = Some(settings.clone());
        self.saves.lock().push(settings.clone());
        Ok(())
    }
}
