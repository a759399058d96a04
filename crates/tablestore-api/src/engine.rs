//! The statement executor.
//!
//! [`Engine`] is the single context object a front-end drives: it owns the
//! catalog, the schemas of the selected database and the file stores for
//! that database. Every operation runs to completion synchronously; UPDATE
//! and DELETE always read and rewrite the whole table.

use crate::command::{Command, Report};
use crate::config::EngineConfig;
use crate::result::{Outcome, ResultSet};
use std::collections::HashMap;
use tablestore_core::text::{split_list, unquote};
use tablestore_core::{parse_column_defs, Condition, Error, ObjectKind, Result, TableSchema};
use tablestore_storage::{validate_name, Catalog, RecordStore, SchemaCodec};

/// Files and schemas of the selected database
#[derive(Debug)]
struct OpenDatabase {
    name: String,
    records: RecordStore,
    schemas: SchemaCodec,
    tables: HashMap<String, TableSchema>,
}

impl OpenDatabase {
    fn table(&self, name: &str) -> Result<&TableSchema> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::NotFound(ObjectKind::Table, name.to_string()))
    }
}

/// The table store engine.
///
/// # Examples
///
/// ```rust,no_run
/// use tablestore::{Engine, EngineConfig};
///
/// let mut engine = Engine::open(EngineConfig::new("./data"))?;
/// engine.create_database("school")?;
/// engine.use_database("school")?;
/// engine.create_table("students", "id INT, name CHAR(20), age INT")?;
/// engine.insert_into("students", "", "1,Alice,20")?;
///
/// let outcome = engine.select_from("students", "*", "age > 18")?;
/// println!("{}", outcome);
/// # Ok::<(), tablestore::Error>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    catalog: Catalog,
    selected: Option<OpenDatabase>,
}

impl Engine {
    /// Opens the engine over `config.data_dir`, discovering existing
    /// databases. No database is selected afterwards.
    pub fn open(config: EngineConfig) -> Result<Self> {
        tracing::info!(data_dir = %config.data_dir.display(), "Opening tablestore");
        let catalog = Catalog::open(&config.data_dir)?;
        Ok(Self {
            config,
            catalog,
            selected: None,
        })
    }

    /// Name of the selected database
    pub fn current_database(&self) -> Option<&str> {
        self.selected.as_ref().map(|db| db.name.as_str())
    }

    /// Schema of `table` in the selected database
    pub fn schema(&self, table: &str) -> Option<&TableSchema> {
        self.selected.as_ref().and_then(|db| db.tables.get(table))
    }

    /// Runs one command, turning any error into a failed [`Report`].
    pub fn execute(&mut self, command: Command) -> Report {
        let kind = command.kind();
        let result = match command {
            Command::CreateDatabase { name } => self.create_database(&name),
            Command::UseDatabase { name } => self.use_database(&name),
            Command::DropDatabase { name } => self.drop_database(&name),
            Command::ShowDatabases => Ok(self.show_databases()),
            Command::CreateTable { name, columns } => self.create_table(&name, &columns),
            Command::DropTable { name } => self.drop_table(&name),
            Command::ShowTables => self.show_tables(),
            Command::Insert {
                table,
                columns,
                values,
            } => self.insert_into(&table, &columns, &values),
            Command::Select {
                table,
                columns,
                where_clause,
            } => self.select_from(&table, &columns, &where_clause),
            Command::Update {
                table,
                set,
                where_clause,
            } => self.update(&table, &set, &where_clause),
            Command::Delete {
                table,
                where_clause,
            } => self.delete_from(&table, &where_clause),
        };

        match result {
            Ok(outcome) => Report::ok(outcome),
            Err(e) => {
                if e.is_user_error() {
                    tracing::warn!(command = kind, error = %e, "Command rejected");
                } else {
                    tracing::error!(command = kind, error = %e, "Command failed");
                }
                Report::failed(&e)
            }
        }
    }

    fn selected(&self) -> Result<&OpenDatabase> {
        self.selected.as_ref().ok_or_else(Error::no_database_selected)
    }

    /// Creates a database directory.
    pub fn create_database(&mut self, name: &str) -> Result<Outcome> {
        self.catalog.create_database(name)?;
        Ok(Outcome::done("Database created successfully."))
    }

    /// Selects a database and reloads every table schema from its directory.
    pub fn use_database(&mut self, name: &str) -> Result<Outcome> {
        let table_names = self.catalog.use_database(name)?;
        // Any earlier selection is gone even if loading fails below.
        self.selected = None;

        let dir = self.catalog.database_dir(name);
        let records = RecordStore::new(&dir, self.config.storage.clone());
        let schemas = SchemaCodec::new(&dir, self.config.storage.clone());

        let mut tables = HashMap::with_capacity(table_names.len());
        for table in table_names {
            let schema = schemas.load(&table)?;
            tables.insert(table, schema);
        }

        self.selected = Some(OpenDatabase {
            name: name.to_string(),
            records,
            schemas,
            tables,
        });
        Ok(Outcome::done(format!("Database changed to '{}'.", name)))
    }

    /// Deletes a database directory and everything in it.
    pub fn drop_database(&mut self, name: &str) -> Result<Outcome> {
        if self.catalog.drop_database(name)? {
            self.selected = None;
        }
        Ok(Outcome::done("Database dropped successfully."))
    }

    /// Lists known databases.
    pub fn show_databases(&self) -> Outcome {
        Outcome::Listing {
            title: "Databases:".to_string(),
            items: self
                .catalog
                .database_names()
                .into_iter()
                .map(String::from)
                .collect(),
            noun: "database",
        }
    }

    /// Creates a table: empty record file, in-memory schema, schema sidecar.
    pub fn create_table(&mut self, name: &str, column_defs: &str) -> Result<Outcome> {
        let db = self.selected.as_mut().ok_or_else(Error::no_database_selected)?;
        validate_name(ObjectKind::Table, name)?;
        if db.tables.contains_key(name) || db.records.exists(name) {
            return Err(Error::AlreadyExists(ObjectKind::Table, name.to_string()));
        }

        let columns = parse_column_defs(column_defs)?;
        db.records.create(name)?;

        let schema = TableSchema::new(name, columns);
        db.tables.insert(name.to_string(), schema.clone());
        self.catalog.register_table(name)?;
        db.schemas.save(&schema)?;

        tracing::info!(database = %db.name, table = name, columns = schema.column_count(), "Created table");
        Ok(Outcome::done("Table created successfully."))
    }

    /// Removes a table's files and forgets it.
    pub fn drop_table(&mut self, name: &str) -> Result<Outcome> {
        let db = self.selected.as_mut().ok_or_else(Error::no_database_selected)?;
        db.table(name)?;

        db.records.drop_table(name)?;
        db.tables.remove(name);
        self.catalog.unregister_table(name)?;

        tracing::info!(database = %db.name, table = name, "Dropped table");
        Ok(Outcome::done("Table dropped successfully."))
    }

    /// Lists the tables of the selected database.
    pub fn show_tables(&self) -> Result<Outcome> {
        let db = self.selected()?;
        let items = self.catalog.tables(&db.name).unwrap_or_default().to_vec();
        Ok(Outcome::Listing {
            title: format!("Tables in database '{}':", db.name),
            items,
            noun: "table",
        })
    }

    /// Appends one record.
    ///
    /// With an explicit column list only its length is checked against the
    /// value count; names are not matched against the schema and values are
    /// stored in the order given. Without one, the value count must equal
    /// the table's column count.
    pub fn insert_into(&mut self, table: &str, column_list: &str, value_list: &str) -> Result<Outcome> {
        let db = self.selected()?;
        let schema = db.table(table)?;

        let values = split_list(value_list, ',');
        let columns = split_list(column_list, ',');
        if !columns.is_empty() {
            if columns.len() != values.len() {
                return Err(Error::Validation(
                    "Column count doesn't match value count".to_string(),
                ));
            }
        } else if values.len() != schema.column_count() {
            return Err(Error::Validation(format!(
                "Value count doesn't match column count ({} values for {} columns)",
                values.len(),
                schema.column_count()
            )));
        }

        db.records.append(table, &values)?;
        tracing::debug!(table, "Inserted row");
        Ok(Outcome::done("1 row inserted."))
    }

    /// Returns the requested columns of every record matching `where_clause`.
    ///
    /// `*` (or an empty list) selects all columns in schema order. Names
    /// that are not in the schema are left out of the result.
    pub fn select_from(&self, table: &str, column_list: &str, where_clause: &str) -> Result<Outcome> {
        let db = self.selected()?;
        let schema = db.table(table)?;

        let requested = match column_list.trim() {
            "*" | "" => schema.column_names(),
            list => split_list(list, ','),
        };
        let projection: Vec<(String, usize)> = requested
            .into_iter()
            .filter_map(|name| schema.column_index(&name).map(|index| (name, index)))
            .collect();

        let predicate = Condition::parse(where_clause).bind(schema);
        let rows: Vec<Vec<String>> = db
            .records
            .read_all(table)?
            .into_iter()
            .filter(|record| predicate.matches(record))
            .map(|record| {
                projection
                    .iter()
                    .map(|(_, index)| record.get(*index).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        tracing::debug!(table, rows = rows.len(), "Selected rows");
        Ok(Outcome::Rows(ResultSet {
            columns: projection.into_iter().map(|(name, _)| name).collect(),
            rows,
        }))
    }

    /// Applies `set_clause` to every matching record and rewrites the table.
    ///
    /// Assignments to unknown columns are ignored. When nothing matches the
    /// record file is left untouched.
    pub fn update(&mut self, table: &str, set_clause: &str, where_clause: &str) -> Result<Outcome> {
        let db = self.selected()?;
        let schema = db.table(table)?;

        let assignments: Vec<(usize, String)> = parse_assignments(set_clause)
            .into_iter()
            .filter_map(|(column, value)| match schema.column_index(&column) {
                Some(index) => Some((index, value)),
                None => {
                    tracing::debug!(table, column = %column, "Ignoring assignment to unknown column");
                    None
                }
            })
            .collect();

        let predicate = Condition::parse(where_clause).bind(schema);
        let mut records = db.records.read_all(table)?;
        let mut updated = 0;
        for record in records.iter_mut().filter(|r| predicate.matches(r.as_slice())) {
            for (index, value) in &assignments {
                if let Some(field) = record.get_mut(*index) {
                    field.clone_from(value);
                }
            }
            updated += 1;
        }

        if updated > 0 {
            db.records.rewrite(table, &records)?;
        }

        tracing::debug!(table, rows = updated, "Updated rows");
        Ok(Outcome::Affected {
            count: updated,
            verb: "updated",
        })
    }

    /// Removes every matching record, keeping the rest in order.
    pub fn delete_from(&mut self, table: &str, where_clause: &str) -> Result<Outcome> {
        let db = self.selected()?;
        let schema = db.table(table)?;

        let predicate = Condition::parse(where_clause).bind(schema);
        let (deleted, kept): (Vec<_>, Vec<_>) = db
            .records
            .read_all(table)?
            .into_iter()
            .partition(|record| predicate.matches(record));

        if !deleted.is_empty() {
            db.records.rewrite(table, &kept)?;
        }

        tracing::debug!(table, rows = deleted.len(), "Deleted rows");
        Ok(Outcome::Affected {
            count: deleted.len(),
            verb: "deleted",
        })
    }

    /// Re-writes the schema sidecar of every loaded table.
    pub fn sync(&self) -> Result<()> {
        if let Some(db) = &self.selected {
            for schema in db.tables.values() {
                db.schemas.save(schema)?;
            }
        }
        Ok(())
    }
}

/// Parses `col = value, col2 = 'value'` into trimmed, unquoted pairs.
/// Pieces without `=` are skipped.
fn parse_assignments(set_clause: &str) -> Vec<(String, String)> {
    split_list(set_clause, ',')
        .iter()
        .filter_map(|part| {
            let (column, value) = part.split_once('=')?;
            Some((column.trim().to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}
