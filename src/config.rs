use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub const STORAGE_PATH_KEY: &str = "storage.path";
pub const DEFAULT_STORAGE_PATH: &str = "./db.json";

/// Checks a `storage.path` value before it is saved and returns it with
/// `~` expanded. The data file itself may not exist yet; its directory must.
fn check_data_path(value: &str) -> Result<PathBuf, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidConfig(format!("{STORAGE_PATH_KEY}: {reason}"));

    if value.trim().is_empty() {
        return Err(invalid("no path given".to_string()));
    }
    if value.contains('\0') {
        return Err(invalid("path contains a NUL byte".to_string()));
    }

    let path = expand_path(value);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => return Ok(path),
    };

    let metadata = std::fs::metadata(dir)
        .map_err(|_| invalid(format!("{} does not exist, create it first", dir.display())))?;
    if !metadata.is_dir() {
        return Err(invalid(format!("{} is not a directory", dir.display())));
    }
    if metadata.permissions().readonly() {
        return Err(invalid(format!("{} is read-only", dir.display())));
    }

    Ok(path)
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub storage_path: Option<String>,
}

/// Location of the config file when none is given on the command line.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::InvalidConfig("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".config").join("localtodo").join("config.json"))
}

pub struct ConfigManager {
    path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Loads the config file at `config_path`, or the default location.
    /// A missing file yields the defaults; nothing is written until `set`.
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Config::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            Config::default()
        };
        debug!(path = %path.display(), "loaded config");

        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match key {
            STORAGE_PATH_KEY => Ok(self.config.storage_path.clone()),
            _ => Err(ConfigError::InvalidKey(key.to_string())),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            STORAGE_PATH_KEY => {
                let path = check_data_path(value)?;
                self.config.storage_path = Some(path.to_string_lossy().to_string());
            }
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        self.save()
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            STORAGE_PATH_KEY => self.config.storage_path = None,
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        self.save()
    }

    /// Every key with its effective value and whether that value is the default.
    pub fn list(&self) -> Vec<(String, String, bool)> {
        let storage_path = match &self.config.storage_path {
            Some(value) => (STORAGE_PATH_KEY.to_string(), value.clone(), false),
            None => (
                STORAGE_PATH_KEY.to_string(),
                DEFAULT_STORAGE_PATH.to_string(),
                true,
            ),
        };
        vec![storage_path]
    }

    /// The data file location, with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        expand_path(
            self.config
                .storage_path
                .as_deref()
                .unwrap_or(DEFAULT_STORAGE_PATH),
        )
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}
