// todostore - Task list state management with pluggable key-value persistence

pub mod autosave;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod models;
pub mod shell;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod store;
pub mod term;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use controller::{Controller, Event, View};
pub use error::{StorageError, StoreError, ValidationError};
pub use filter::Filter;
pub use models::{MAX_TEXT_LEN, Task};
pub use stats::Stats;
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, Storage};
pub use store::{STORAGE_KEY, TaskStore};
pub use term::TerminalView;
