//! Engine configuration

use std::path::PathBuf;
use tablestore_storage::{StorageConfig, SyncMode};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding one subdirectory per database
    pub data_dir: PathBuf,
    /// File write behaviour
    pub storage: StorageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Config rooted at `data_dir` with default storage settings
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Set storage configuration
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Shorthand for fsync-on-every-write
    pub fn durable(mut self) -> Self {
        self.storage = self.storage.with_sync_mode(SyncMode::Sync);
        self
    }
}
