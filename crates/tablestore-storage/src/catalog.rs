//! Catalog - the registry of databases and their tables.
//!
//! The directory tree is the only source of truth: databases are the
//! subdirectories of the data directory and tables are the `.table` files
//! inside a database directory. Nothing here is written to disk besides
//! creating and removing those directories. The current database is
//! in-memory state and starts out unset.

use crate::TABLE_SUFFIX;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tablestore_core::{Error, ObjectKind, Result};

/// Rejects names that cannot be used as a single path component.
pub fn validate_name(kind: ObjectKind, name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if invalid {
        return Err(Error::Validation(format!(
            "Invalid {} name '{}'",
            kind.to_string().to_lowercase(),
            name
        )));
    }
    Ok(())
}

/// Registry of known databases
#[derive(Debug)]
pub struct Catalog {
    /// Directory holding one subdirectory per database
    root: PathBuf,
    /// Database name -> table names
    databases: BTreeMap<String, Vec<String>>,
    /// Currently selected database
    current: Option<String>,
}

impl Catalog {
    /// Opens the catalog rooted at `root`, creating the directory if needed
    /// and registering every visible subdirectory as a database.
    ///
    /// Table lists start empty; they are filled by [`Catalog::use_database`].
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let mut databases = BTreeMap::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    databases.insert(name.to_string(), Vec::new());
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            databases = databases.len(),
            "Discovered databases"
        );

        Ok(Self {
            root,
            databases,
            current: None,
        })
    }

    /// Data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing database `name`
    pub fn database_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Currently selected database, if any
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// All known database names, sorted
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    /// Table names registered for `database`
    pub fn tables(&self, database: &str) -> Option<&[String]> {
        self.databases.get(database).map(Vec::as_slice)
    }

    /// Creates the backing directory and registers an empty database.
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        validate_name(ObjectKind::Database, name)?;
        if self.contains(name) {
            return Err(Error::AlreadyExists(ObjectKind::Database, name.to_string()));
        }

        fs::create_dir(self.database_dir(name)).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                Error::AlreadyExists(ObjectKind::Database, name.to_string())
            }
            _ => Error::Io(e),
        })?;

        self.databases.insert(name.to_string(), Vec::new());
        tracing::info!(database = name, "Created database");
        Ok(())
    }

    /// Selects `name` as the current database and rediscovers its tables
    /// from the `.table` files in its directory.
    ///
    /// Returns the discovered table names, sorted. On failure the previous
    /// selection is kept.
    pub fn use_database(&mut self, name: &str) -> Result<Vec<String>> {
        if !self.contains(name) {
            return Err(Error::NotFound(ObjectKind::Database, name.to_string()));
        }

        let tables = Self::scan_tables(&self.database_dir(name))?;
        self.databases.insert(name.to_string(), tables.clone());
        self.current = Some(name.to_string());

        tracing::info!(database = name, tables = tables.len(), "Using database");
        Ok(tables)
    }

    fn scan_tables(dir: &Path) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if let Some(table) = entry
                .file_name()
                .to_str()
                .and_then(|n| n.strip_suffix(TABLE_SUFFIX))
            {
                if !table.is_empty() {
                    tables.push(table.to_string());
                }
            }
        }
        tables.sort();
        Ok(tables)
    }

    /// Recursively deletes the database directory and forgets it.
    ///
    /// Returns `true` if it was the current database, in which case the
    /// selection has been cleared.
    pub fn drop_database(&mut self, name: &str) -> Result<bool> {
        if !self.contains(name) {
            return Err(Error::NotFound(ObjectKind::Database, name.to_string()));
        }

        match fs::remove_dir_all(self.database_dir(name)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(database = name, "Database directory already gone");
            }
            Err(e) => return Err(e.into()),
        }

        self.databases.remove(name);
        let was_current = self.current.as_deref() == Some(name);
        if was_current {
            self.current = None;
        }

        tracing::info!(database = name, "Dropped database");
        Ok(was_current)
    }

    /// Adds `table` to the current database's list.
    pub fn register_table(&mut self, table: &str) -> Result<()> {
        let tables = self.current_tables_mut()?;
        if !tables.iter().any(|t| t == table) {
            tables.push(table.to_string());
        }
        Ok(())
    }

    /// Removes `table` from the current database's list.
    pub fn unregister_table(&mut self, table: &str) -> Result<()> {
        self.current_tables_mut()?.retain(|t| t != table);
        Ok(())
    }

    fn current_tables_mut(&mut self) -> Result<&mut Vec<String>> {
        let current = self.current.as_ref().ok_or_else(Error::no_database_selected)?;
        self.databases
            .get_mut(current)
            .ok_or_else(|| Error::NotFound(ObjectKind::Database, current.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_discovers_directories_only() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("school")).unwrap();
        fs::create_dir(dir.path().join("shop")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        assert_eq!(catalog.database_names(), vec!["school", "shop"]);
        assert_eq!(catalog.current(), None);
    }

    #[test]
    fn test_open_creates_missing_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");
        let catalog = Catalog::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(catalog.database_names().is_empty());
    }

    #[test]
    fn test_create_database() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();

        catalog.create_database("school").unwrap();
        assert!(dir.path().join("school").is_dir());
        assert_eq!(catalog.tables("school"), Some(&[][..]));

        assert!(matches!(
            catalog.create_database("school").unwrap_err(),
            Error::AlreadyExists(ObjectKind::Database, _)
        ));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();
        for name in ["", ".", "..", "a/b", "a\\b"] {
            assert!(matches!(
                catalog.create_database(name).unwrap_err(),
                Error::Validation(_)
            ));
        }
    }

    #[test]
    fn test_use_database_scans_tables() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();
        catalog.create_database("school").unwrap();
        let db_dir = catalog.database_dir("school");
        fs::write(db_dir.join("students.table"), "").unwrap();
        fs::write(db_dir.join("students.table.info"), "id INT 4\n").unwrap();
        fs::write(db_dir.join("courses.table"), "").unwrap();

        let tables = catalog.use_database("school").unwrap();
        assert_eq!(tables, vec!["courses", "students"]);
        assert_eq!(catalog.current(), Some("school"));
        assert_eq!(catalog.tables("school").unwrap().len(), 2);
    }

    #[test]
    fn test_use_unknown_database() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();
        assert!(matches!(
            catalog.use_database("ghost").unwrap_err(),
            Error::NotFound(ObjectKind::Database, _)
        ));
    }

    #[test]
    fn test_drop_current_database_clears_selection() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();
        catalog.create_database("school").unwrap();
        catalog.create_database("shop").unwrap();
        catalog.use_database("school").unwrap();
        fs::write(catalog.database_dir("school").join("t.table"), "1\n").unwrap();

        assert!(!catalog.drop_database("shop").unwrap());
        assert_eq!(catalog.current(), Some("school"));

        assert!(catalog.drop_database("school").unwrap());
        assert_eq!(catalog.current(), None);
        assert!(!dir.path().join("school").exists());
        assert!(catalog.database_names().is_empty());

        assert!(matches!(
            catalog.drop_database("school").unwrap_err(),
            Error::NotFound(ObjectKind::Database, _)
        ));
    }

    #[test]
    fn test_register_requires_selection() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::open(dir.path()).unwrap();
        assert!(matches!(
            catalog.register_table("t").unwrap_err(),
            Error::Validation(_)
        ));

        catalog.create_database("db").unwrap();
        catalog.use_database("db").unwrap();
        catalog.register_table("t").unwrap();
        catalog.register_table("t").unwrap();
        assert_eq!(catalog.tables("db").unwrap(), ["t".to_string()]);

        catalog.unregister_table("t").unwrap();
        assert!(catalog.tables("db").unwrap().is_empty());
    }
}
