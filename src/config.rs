use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("UNISEARCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_root.join("config.toml"))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("unisearch/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SearchError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SearchError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.backend {
            self.backend.merge(patch);
        }
        if let Some(patch) = patch.session {
            self.session.merge(patch);
        }
        if let Some(patch) = patch.display {
            self.display.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("UNISEARCH_ENDPOINT") {
            self.backend.endpoint = value;
        }
        if let Some(value) = env_string("UNISEARCH_API_KEY") {
            self.backend.api_key = value;
        }
        if let Some(value) = env_string("UNISEARCH_EXPERIENCE_KEY") {
            self.backend.experience_key = value;
        }
        if let Some(value) = env_string("UNISEARCH_VERSION") {
            self.backend.version = value;
        }
        if let Some(value) = env_string("UNISEARCH_LOCALE") {
            self.backend.locale = value;
        }
        if let Some(value) = env_u64("UNISEARCH_TIMEOUT_SECS")? {
            self.backend.timeout_secs = value;
        }

        if let Some(value) = env_string("UNISEARCH_SETTINGS_PATH") {
            self.session.settings_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_usize("UNISEARCH_SUGGESTION_MIN_CHARS")? {
            self.session.suggestion_min_chars = value;
        }
        if let Some(value) = env_u64("UNISEARCH_FOCUS_DELAY_MS")? {
            self.session.focus_delay_ms = value;
        }
        if let Some(value) = env_u64("UNISEARCH_PAGE_SIZE")? {
            let size = u32::try_from(value).map_err(|err| {
                SearchError::Config(format!("invalid UNISEARCH_PAGE_SIZE value {value}: {err}"))
            })?;
            self.session.page_size = Some(size);
        }

        if let Some(value) = env_bool("UNISEARCH_SHOW_ERRORS") {
            self.display.show_errors = value;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub endpoint: String,
    pub api_key: String,
    pub experience_key: String,
    pub version: String,
    pub locale: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://liveapi.yext.com".to_string(),
            api_key: String::new(),
            experience_key: String::new(),
            version: "PRODUCTION".to_string(),
            locale: "en".to_string(),
            api_version: "20220511".to_string(),
            timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    fn merge(&mut self, patch: BackendPatch) {
        if let Some(value) = patch.endpoint {
            self.endpoint = value;
        }
        if let Some(value) = patch.api_key {
            self.api_key = value;
        }
        if let Some(value) = patch.experience_key {
            self.experience_key = value;
        }
        if let Some(value) = patch.version {
            self.version = value;
        }
        if let Some(value) = patch.locale {
            self.locale = value;
        }
        if let Some(value) = patch.api_version {
            self.api_version = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where persisted search settings live. Defaults to the data dir.
    pub settings_path: Option<PathBuf>,
    pub suggestion_min_chars: usize,
    pub focus_delay_ms: u64,
    /// Terminal width (columns) below which the mobile layout is used.
    pub mobile_breakpoint: u16,
    /// Results per page for paged views. Unset pages at offset 0.
    pub page_size: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            suggestion_min_chars: 3,
            focus_delay_ms: 300,
            mobile_breakpoint: 80,
            page_size: None,
        }
    }
}

impl SessionConfig {
    fn merge(&mut self, patch: SessionPatch) {
        if let Some(value) = patch.settings_path {
            self.settings_path = Some(value);
        }
        if let Some(value) = patch.suggestion_min_chars {
            self.suggestion_min_chars = value;
        }
        if let Some(value) = patch.focus_delay_ms {
            self.focus_delay_ms = value;
        }
        if let Some(value) = patch.mobile_breakpoint {
            self.mobile_breakpoint = value;
        }
        if let Some(value) = patch.page_size {
            self.page_size = Some(value);
        }
    }

    #[must_use]
    pub const fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Results shown per group in the universal view.
    pub preview_results: usize,
    pub show_results: usize,
    /// Render transport failures instead of an empty results area.
    pub show_errors: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_results: 3,
            show_results: 5,
            show_errors: false,
        }
    }
}

impl DisplayConfig {
    fn merge(&mut self, patch: DisplayPatch) {
        if let Some(value) = patch.preview_results {
            self.preview_results = value;
        }
        if let Some(value) = patch.show_results {
            self.show_results = value;
        }
        if let Some(value) = patch.show_errors {
            self.show_errors = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub backend: Option<BackendPatch>,
    pub session: Option<SessionPatch>,
    pub display: Option<DisplayPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BackendPatch {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub experience_key: Option<String>,
    pub version: Option<String>,
    pub locale: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SessionPatch {
    pub settings_path: Option<PathBuf>,
    pub suggestion_min_chars: Option<usize>,
    pub focus_delay_ms: Option<u64>,
    pub mobile_breakpoint: Option<u16>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DisplayPatch {
    pub preview_results: Option<usize>,
    pub show_results: Option<usize>,
    pub show_errors: Option<bool>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| SearchError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| SearchError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
