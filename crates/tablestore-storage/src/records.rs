//! Record files - one record per line, fields joined by commas.
//!
//! The format has no quoting or escaping, so a field may not contain a comma
//! or a line break; [`encode_record`] rejects such fields before anything is
//! written. Files must be UTF-8: a line that is not is reported as a
//! validation error naming its line number.

use crate::{schema_path, table_path, StorageConfig};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tablestore_core::{Error, ObjectKind, Record, Result};
use tempfile::NamedTempFile;

/// Renders one record as a line (without the trailing newline).
pub fn encode_record(fields: &[String]) -> Result<String> {
    if let Some(bad) = fields
        .iter()
        .find(|f| f.contains(|c: char| c == ',' || c == '\n' || c == '\r'))
    {
        return Err(Error::Validation(format!(
            "Value '{}' contains a comma or line break",
            bad.escape_debug()
        )));
    }
    Ok(fields.join(","))
}

/// Splits one stored line into trimmed fields.
pub fn decode_record(line: &str) -> Record {
    line.split(',').map(|field| field.trim().to_string()).collect()
}

/// Record storage for the tables of one database directory
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
    config: StorageConfig,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>, config: StorageConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Database directory this store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `table` has a record file on disk
    pub fn exists(&self, table: &str) -> bool {
        table_path(&self.dir, table).exists()
    }

    /// Creates an empty record file. Fails if one already exists.
    pub fn create(&self, table: &str) -> Result<()> {
        let path = table_path(&self.dir, table);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    Error::AlreadyExists(ObjectKind::Table, table.to_string())
                }
                _ => Error::Io(e),
            })?;

        tracing::debug!(path = %path.display(), "Created record file");
        Ok(())
    }

    /// Appends one record to the end of the table's file.
    pub fn append(&self, table: &str, fields: &[String]) -> Result<()> {
        let mut line = encode_record(fields)?;
        line.push('\n');

        let path = table_path(&self.dir, table);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;
        if self.config.fsync() {
            file.sync_all()?;
        }

        tracing::debug!(table, fields = fields.len(), "Appended record");
        Ok(())
    }

    /// Reads every non-blank line of the table's file, in file order.
    pub fn read_all(&self, table: &str) -> Result<Vec<Record>> {
        let file = File::open(table_path(&self.dir, table))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (number, bytes) in reader.split(b'\n').enumerate() {
            let line = String::from_utf8(bytes?).map_err(|_| {
                Error::Validation(format!(
                    "Line {} of table '{}' is not valid UTF-8",
                    number + 1,
                    table
                ))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(decode_record(&line));
        }

        tracing::debug!(table, rows = records.len(), "Read records");
        Ok(records)
    }

    /// Replaces the table's file with `records`, in the given order.
    ///
    /// With `atomic_rewrite` the new contents go to a temporary file in the
    /// same directory which is then renamed over the old file. The old
    /// file's permissions carry over to the new one.
    pub fn rewrite(&self, table: &str, records: &[Record]) -> Result<()> {
        let mut contents = String::new();
        for record in records {
            contents.push_str(&encode_record(record)?);
            contents.push('\n');
        }

        let path = table_path(&self.dir, table);
        if self.config.atomic_rewrite {
            let mut temp = NamedTempFile::new_in(&self.dir)?;
            temp.write_all(contents.as_bytes())?;
            match fs::metadata(&path) {
                Ok(metadata) => fs::set_permissions(temp.path(), metadata.permissions())?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            if self.config.fsync() {
                temp.as_file().sync_all()?;
            }
            temp.persist(&path).map_err(|e| Error::Io(e.error))?;

            // The rename is only durable once the directory entry is synced.
            if self.config.fsync() {
                if let Ok(dir) = File::open(&self.dir) {
                    dir.sync_all()?;
                }
            }
        } else {
            let mut file = File::create(&path)?;
            file.write_all(contents.as_bytes())?;
            if self.config.fsync() {
                file.sync_all()?;
            }
        }

        tracing::debug!(table, rows = records.len(), "Rewrote record file");
        Ok(())
    }

    /// Removes the record file and the schema sidecar. Missing files are
    /// not an error.
    pub fn drop_table(&self, table: &str) -> Result<()> {
        for path in [table_path(&self.dir, table), schema_path(&self.dir, table)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Already absent");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fields(values: &[&str]) -> Record {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_create_twice_fails() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());

        store.create("users").unwrap();
        assert!(store.exists("users"));
        assert!(matches!(
            store.create("users").unwrap_err(),
            Error::AlreadyExists(ObjectKind::Table, _)
        ));
    }

    #[test]
    fn test_append_and_read_all() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        store.create("users").unwrap();

        store.append("users", &fields(&["1", "Alice", "20"])).unwrap();
        store.append("users", &fields(&["2", "Bob", "25"])).unwrap();

        let raw = fs::read_to_string(table_path(dir.path(), "users")).unwrap();
        assert_eq!(raw, "1,Alice,20\n2,Bob,25\n");

        let records = store.read_all("users").unwrap();
        assert_eq!(records, vec![fields(&["1", "Alice", "20"]), fields(&["2", "Bob", "25"])]);
    }

    #[test]
    fn test_read_all_skips_blank_lines_and_trims() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        fs::write(table_path(dir.path(), "t"), "1, Alice ,20\n\n   \n2,Bob,25\r\n").unwrap();

        let records = store.read_all("t").unwrap();
        assert_eq!(records, vec![fields(&["1", "Alice", "20"]), fields(&["2", "Bob", "25"])]);
    }

    #[test]
    fn test_read_all_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        assert!(matches!(store.read_all("nope").unwrap_err(), Error::Io(_)));
    }

    #[test]
    fn test_rewrite_replaces_contents_in_order() {
        for atomic in [true, false] {
            let dir = tempdir().unwrap();
            let config = StorageConfig::default().with_atomic_rewrite(atomic);
            let store = RecordStore::new(dir.path(), config);
            store.create("t").unwrap();
            store.append("t", &fields(&["1", "a"])).unwrap();
            store.append("t", &fields(&["2", "b"])).unwrap();

            store
                .rewrite("t", &[fields(&["2", "B"]), fields(&["3", "c"])])
                .unwrap();

            let raw = fs::read_to_string(table_path(dir.path(), "t")).unwrap();
            assert_eq!(raw, "2,B\n3,c\n");

            // No temporary files left behind.
            let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
            assert_eq!(entries.len(), 1);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        store.create("t").unwrap();
        store.append("t", &fields(&["1", "a"])).unwrap();

        let path = table_path(dir.path(), "t");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store.rewrite("t", &[fields(&["1", "b"])]).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,b\n");
    }

    #[test]
    fn test_atomic_rewrite_with_sync() {
        let dir = tempdir().unwrap();
        let config = StorageConfig::default().with_sync_mode(crate::SyncMode::Sync);
        let store = RecordStore::new(dir.path(), config);
        store.create("t").unwrap();
        store.append("t", &fields(&["1", "a"])).unwrap();

        store.rewrite("t", &[fields(&["2", "b"])]).unwrap();
        assert_eq!(store.read_all("t").unwrap(), vec![fields(&["2", "b"])]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_all_reports_invalid_utf8_line() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        fs::write(table_path(dir.path(), "t"), b"1,a,20\n\n4,\xff\xfe,9\n").unwrap();

        match store.read_all("t").unwrap_err() {
            Error::Validation(message) => {
                assert_eq!(message, "Line 3 of table 't' is not valid UTF-8")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_empty_truncates() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        store.create("t").unwrap();
        store.append("t", &fields(&["1"])).unwrap();

        store.rewrite("t", &[]).unwrap();
        assert!(store.read_all("t").unwrap().is_empty());
    }

    #[test]
    fn test_delimiters_in_values_rejected() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        store.create("t").unwrap();

        assert!(matches!(
            store.append("t", &fields(&["a\nb"])).unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            store.rewrite("t", &[fields(&["a,b"])]).unwrap_err(),
            Error::Validation(_)
        ));
        assert_eq!(fs::read_to_string(table_path(dir.path(), "t")).unwrap(), "");
    }

    #[test]
    fn test_drop_table_removes_both_files_and_tolerates_absence() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path(), StorageConfig::default());
        store.create("t").unwrap();
        fs::write(schema_path(dir.path(), "t"), "id INT 4\n").unwrap();

        store.drop_table("t").unwrap();
        assert!(!table_path(dir.path(), "t").exists());
        assert!(!schema_path(dir.path(), "t").exists());

        store.drop_table("t").unwrap();
    }

    #[test]
    fn test_sync_mode_append() {
        let dir = tempdir().unwrap();
        let config = StorageConfig::default().with_sync_mode(crate::SyncMode::Sync);
        let store = RecordStore::new(dir.path(), config);
        store.create("t").unwrap();
        store.append("t", &fields(&["1", "x"])).unwrap();
        assert_eq!(store.read_all("t").unwrap().len(), 1);
    }
}
