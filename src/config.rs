// Configuration loaded from YAML

use crate::storage::{FileStorage, MemoryStorage, SqliteStorage, Storage, validate_key};
use crate::store::STORAGE_KEY;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the task list is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key in the data directory
    #[default]
    File,
    /// Key-value table in `todostore.db`
    Sqlite,
    /// Nothing survives the process
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub backend: Backend,
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub autosave_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::File,
            data_dir: None,
            storage_key: STORAGE_KEY.to_string(),
            autosave_secs: 30,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/todostore/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("todostore").join("config.yaml"))
    }

    /// Load from `path`, or from the default location
    ///
    /// An explicit path must exist. A missing default file gives defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context(format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context(format!("Failed to parse config {}", path.display()))?;
        info!(file = ?path, "Loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validate_key(&self.storage_key).map_err(|e| eyre!("storage-key: {}", e))?;
        if self.autosave_secs == 0 {
            return Err(eyre!("autosave-secs must be greater than zero"));
        }
        Ok(())
    }

    /// Directory holding the data files
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("todostore")))
            .unwrap_or_else(|| PathBuf::from(".todostore"))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }

    /// Open the configured storage adapter
    pub fn open_storage(&self) -> Result<Box<dyn Storage>> {
        let storage: Box<dyn Storage> = match self.backend {
            Backend::File => Box::new(FileStorage::open(self.data_dir())?),
            Backend::Sqlite => Box::new(SqliteStorage::open(self.data_dir().join("todostore.db"))?),
            Backend::Memory => Box::new(MemoryStorage::new()),
        };
        debug!(backend = ?self.backend, dir = ?self.data_dir(), "Opened storage");
        Ok(storage)
    }

    /// Open the configured storage, falling back to memory when it cannot be opened
    ///
    /// The second value describes the failure so it can be shown to the user.
    pub fn open_storage_or_memory(&self) -> (Box<dyn Storage>, Option<String>) {
        match self.open_storage() {
            Ok(storage) => (storage, None),
            Err(e) => {
                warn!(backend = ?self.backend, error = %format!("{:#}", e), "Storage unavailable, using memory");
                let message = format!("Storage unavailable ({:#}); changes will not be saved", e);
                (Box::new(MemoryStorage::new()), Some(message))
            }
        }
    }
}
