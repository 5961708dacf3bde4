use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ExplorerError;
use crate::models::{ScenarioDefaults, TimeConfig};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "growth-explorer.toml";

/// Settings shared by the CLI and the web server.
///
/// ```toml
/// [time]
/// horizon = 50.0
/// resolution = 500
///
/// [defaults]
/// model = "logistic"
/// n0 = 10.0
/// r = 0.1
/// k = 100.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub defaults: ScenarioDefaults,
}

impl ExplorerConfig {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `growth-explorer.toml` in the
    /// working directory is used when present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ExplorerError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ExplorerError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ExplorerError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ExplorerError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ExplorerError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ExplorerError> {
        self.time.validate()?;
        self.defaults.validate()
    }
}
