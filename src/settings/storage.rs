//! JSON file storage for search settings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder;

use tracing::debug;

use crate::error::{Result, SearchError};

use super::{SearchSettings, SettingsStore};

/// Settings persisted as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<SearchSettings> {
        if !self.path.exists() {
            return Ok(self.defaults());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(self.defaults());
        }
        let settings: SearchSettings = serde_json::from_str(&raw)
            .map_err(|err| SearchError::Serialization(format!("settings parse: {err}")))?;
        Ok(settings)
    }

    fn save(&self, settings: &SearchSettings) -> Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let payload = serde_json::to_string_pretty(settings)
            .map_err(|err| SearchError::Serialization(format!("settings serialize: {err}")))?;

        // Written beside the target and renamed over it, so readers never
        // see a half-written record.
        let mut temp = Builder::new().prefix(".settings-").tempfile_in(parent)?;
        temp.write_all(payload.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|err| SearchError::Io(err.error))?;
        debug!(path = %self.path.display(), input = %settings.input, "settings saved");
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        // A corrupt record is replaced rather than blocking the session.
        let current = match self.load() {
            Ok(settings) => settings,
            Err(err) => {
                debug!(error = %err, "replacing unreadable settings with defaults");
                self.defaults()
            }
        };
        self.save(&current)
    }
}
