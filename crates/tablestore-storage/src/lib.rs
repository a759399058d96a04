//! # tablestore Storage
//!
//! Filesystem layer for tablestore.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! **This crate is an internal implementation detail of tablestore.**
//!
//! Users should depend on the main `tablestore` crate instead, which provides
//! the stable public API. This crate's API may change without notice between
//! minor versions.
//!
//! ---
//!
//! On-disk layout, relative to the data directory:
//!
//! ```text
//! <db>/                  one directory per database
//! <db>/<table>.table     records: one per line, fields comma-joined
//! <db>/<table>.table.info  schema: one `name TYPE size` line per column
//! ```
//!
//! - **Catalog**: databases discovered by directory scan, never persisted
//! - **RecordStore**: append, read and whole-file rewrite of `.table` files
//! - **SchemaCodec**: load and save of `.table.info` sidecars

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod catalog;
pub mod records;
pub mod schema;

pub use catalog::{validate_name, Catalog};
pub use records::RecordStore;
pub use schema::SchemaCodec;

/// Suffix of a table's record file
pub const TABLE_SUFFIX: &str = ".table";
/// Suffix of a table's schema sidecar
pub const SCHEMA_SUFFIX: &str = ".table.info";

/// Path of the record file for `table` inside a database directory.
pub fn table_path(db_dir: &Path, table: &str) -> PathBuf {
    db_dir.join(format!("{}{}", table, TABLE_SUFFIX))
}

/// Path of the schema sidecar for `table` inside a database directory.
pub fn schema_path(db_dir: &Path, table: &str) -> PathBuf {
    db_dir.join(format!("{}{}", table, SCHEMA_SUFFIX))
}

/// Sync mode for file writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Call fsync after every append and rewrite
    Sync,
    /// Leave flushing to the OS (fastest, unsafe for power loss)
    None,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Whether writes are fsynced before returning
    pub sync_mode: SyncMode,
    /// Rewrite record files through a temporary file and rename, so a crash
    /// mid-rewrite leaves either the old or the new contents
    pub atomic_rewrite: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sync_mode: SyncMode::None,
            atomic_rewrite: true,
        }
    }
}

impl StorageConfig {
    /// Set the sync mode
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Enable or disable temp-file-and-rename rewrites
    pub fn with_atomic_rewrite(mut self, atomic: bool) -> Self {
        self.atomic_rewrite = atomic;
        self
    }

    pub(crate) fn fsync(&self) -> bool {
        matches!(self.sync_mode, SyncMode::Sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let dir = Path::new("school");
        assert_eq!(table_path(dir, "students"), PathBuf::from("school/students.table"));
        assert_eq!(
            schema_path(dir, "students"),
            PathBuf::from("school/students.table.info")
        );
    }

    #[test]
    fn test_config_builders() {
        let config = StorageConfig::default()
            .with_sync_mode(SyncMode::Sync)
            .with_atomic_rewrite(false);
        assert_eq!(config.sync_mode, SyncMode::Sync);
        assert!(!config.atomic_rewrite);
        assert!(config.fsync());
        assert!(StorageConfig::default().atomic_rewrite);
    }
}
