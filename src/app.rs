use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::session::SessionOptions;
use crate::settings::JsonSettingsStore;
use crate::transport::HttpTransport;

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub settings_path: PathBuf,
    pub robot_mode: bool,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&root));
        let config = Config::load(cli.config.as_deref(), &root)?;
        let settings_path = config
            .session
            .settings_path
            .clone()
            .unwrap_or_else(|| root.join("settings.json"));

        Ok(Self {
            root,
            config_path,
            config,
            settings_path,
            robot_mode: cli.robot,
        })
    }

    /// Context over an explicit root, bypassing discovery.
    #[must_use]
    pub fn with_root(root: PathBuf, config: Config) -> Self {
        let settings_path = config
            .session
            .settings_path
            .clone()
            .unwrap_or_else(|| root.join("settings.json"));
        Self {
            config_path: root.join("config.toml"),
            root,
            config,
            settings_path,
            robot_mode: false,
        }
    }

    #[must_use]
    pub fn settings_store(&self) -> JsonSettingsStore {
        JsonSettingsStore::new(&self.settings_path)
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        HttpTransport::from_config(&self.config.backend)
    }

    #[must_use]
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions::from_config(&self.config)
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("UNISEARCH_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".unisearch") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| SearchError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("unisearch"))
    }
}

fn default_config_path(root: &Path) -> PathBuf {
    if root.ends_with(".unisearch") {
        root.join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| root.to_path_buf())
            .join("unisearch/config.toml")
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}
