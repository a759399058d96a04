//! Schema sidecars (`<table>.table.info`).

use crate::{schema_path, StorageConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tablestore_core::{Column, Result, TableSchema};

/// Reads and writes the schema sidecars of one database directory
#[derive(Debug, Clone)]
pub struct SchemaCodec {
    dir: PathBuf,
    config: StorageConfig,
}

impl SchemaCodec {
    pub fn new(dir: impl Into<PathBuf>, config: StorageConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Writes one `name TYPE size` line per column, replacing any existing
    /// sidecar.
    pub fn save(&self, table: &TableSchema) -> Result<()> {
        let path = schema_path(&self.dir, &table.name);
        let mut writer = BufWriter::new(File::create(&path)?);
        for column in &table.columns {
            writeln!(writer, "{}", column.to_sidecar_line())?;
        }
        writer.flush()?;
        if self.config.fsync() {
            writer.get_ref().sync_all()?;
        }

        tracing::debug!(table = %table.name, columns = table.columns.len(), "Saved schema");
        Ok(())
    }

    /// Loads a table's columns from its sidecar.
    ///
    /// Parsing is best-effort: blank lines are skipped and malformed tokens
    /// fall back to defaults. A missing sidecar yields a schema with no
    /// columns.
    pub fn load(&self, table: &str) -> Result<TableSchema> {
        let path = schema_path(&self.dir, table);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(table, path = %path.display(), "Schema sidecar missing");
                return Ok(TableSchema::new(table, Vec::new()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut columns = Vec::new();
        for line in BufReader::new(file).lines() {
            if let Some(column) = Column::from_sidecar_line(&line?) {
                columns.push(column);
            }
        }

        Ok(TableSchema::new(table, columns))
    }
}
