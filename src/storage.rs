// Key-value persistence adapters

use crate::error::StorageError;
use eyre::{Context, Result};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Durable key-value storage boundary
pub trait Storage {
    /// Replace the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read the value stored under `key`, `None` if absent
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// Validate a storage key
///
/// Keys become file names and SQL values, so they are restricted to
/// alphanumerics plus `_` and `-`.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > 64 {
        return Err(StorageError::InvalidKey(format!("{} (max 64 chars)", key)));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(StorageError::InvalidKey(format!(
            "{} (must be alphanumeric with _/-)",
            key
        )));
    }
    Ok(())
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Non-durable storage for tests and ephemeral sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }
}

// ============================================================================
// File storage
// ============================================================================

/// One `{key}.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open file storage rooted at `dir`, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create storage directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Sidecar file holding the fs2 lock for `key`
    pub fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn lock_file(&self, key: &str) -> std::io::Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path_for(key))
    }
}

impl Storage for FileStorage {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.path_for(key);

        let lock = self.lock_file(key).map_err(|e| StorageError::write(key, e))?;
        lock.lock_exclusive().map_err(|e| StorageError::write(key, e))?;

        // Stage the value beside the target, then rename over it
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::write(key, e))?;
        staged
            .write_all(value.as_bytes())
            .map_err(|e| StorageError::write(key, e))?;
        staged.as_file().sync_all().map_err(|e| StorageError::write(key, e))?;
        staged.persist(&path).map_err(|e| StorageError::write(key, e.error))?;

        debug!(file = ?path, bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let lock = self.lock_file(key).map_err(|e| StorageError::read(key, e))?;
        lock.lock_shared().map_err(|e| StorageError::read(key, e))?;

        let mut file = File::open(&path).map_err(|e| StorageError::read(key, e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| StorageError::read(key, e))?;

        debug!(file = ?path, bytes = content.len(), "Read storage file");
        Ok(Some(content))
    }
}

// ============================================================================
// SQLite storage
// ============================================================================

/// Key-value table in a SQLite database
pub struct SqliteStorage {
    db: Connection,
}

impl SqliteStorage {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }

        let db = Connection::open(path).context("Failed to open SQLite database")?;
        let storage = Self { db };
        storage.create_schema()?;
        Ok(storage)
    }

    /// In-memory database, mostly useful in tests
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open SQLite database")?;
        let storage = Self { db };
        storage.create_schema()?;
        Ok(storage)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating key-value schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.db
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, chrono::Utc::now().timestamp_millis()],
            )
            .map_err(|e| StorageError::write(key, e))?;

        debug!(key, bytes = value.len(), "Wrote storage row");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        self.db
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(|e| StorageError::read(key, e))
    }
}
