//! Commands accepted from a statement front-end, and the report returned
//! for each.
//!
//! A front-end (SQL grammar, REPL, test harness) is expected to have already
//! split a statement into plain-string arguments: table name, column list,
//! value list, SET clause, WHERE clause.

use crate::result::Outcome;
use std::fmt;

/// One already-parsed statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CREATE DATABASE name`
    CreateDatabase {
        /// Database name
        name: String,
    },
    /// `USE name`
    UseDatabase {
        /// Database name
        name: String,
    },
    /// `DROP DATABASE name`
    DropDatabase {
        /// Database name
        name: String,
    },
    /// `SHOW DATABASES`
    ShowDatabases,
    /// `CREATE TABLE name (columns)`
    CreateTable {
        /// Table name
        name: String,
        /// Column definitions, e.g. `id INT, name CHAR(20)`
        columns: String,
    },
    /// `DROP TABLE name`
    DropTable {
        /// Table name
        name: String,
    },
    /// `SHOW TABLES`
    ShowTables,
    /// `INSERT INTO table [(columns)] VALUES (values)`
    Insert {
        /// Target table
        table: String,
        /// Optional column list; empty when omitted
        columns: String,
        /// Comma-separated values
        values: String,
    },
    /// `SELECT columns FROM table [WHERE ...]`
    Select {
        /// Source table
        table: String,
        /// `*` or comma-separated column names
        columns: String,
        /// WHERE clause body; empty when omitted
        where_clause: String,
    },
    /// `UPDATE table SET ... [WHERE ...]`
    Update {
        /// Target table
        table: String,
        /// Comma-separated `col = value` assignments
        set: String,
        /// WHERE clause body; empty when omitted
        where_clause: String,
    },
    /// `DELETE FROM table [WHERE ...]`
    Delete {
        /// Target table
        table: String,
        /// WHERE clause body; empty when omitted
        where_clause: String,
    },
}

impl Command {
    /// `INSERT` without a column list
    pub fn insert(table: impl Into<String>, values: impl Into<String>) -> Self {
        Command::Insert {
            table: table.into(),
            columns: String::new(),
            values: values.into(),
        }
    }

    /// `SELECT`
    pub fn select(
        table: impl Into<String>,
        columns: impl Into<String>,
        where_clause: impl Into<String>,
    ) -> Self {
        Command::Select {
            table: table.into(),
            columns: columns.into(),
            where_clause: where_clause.into(),
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Command::CreateDatabase { .. } => "create_database",
            Command::UseDatabase { .. } => "use_database",
            Command::DropDatabase { .. } => "drop_database",
            Command::ShowDatabases => "show_databases",
            Command::CreateTable { .. } => "create_table",
            Command::DropTable { .. } => "drop_table",
            Command::ShowTables => "show_tables",
            Command::Insert { .. } => "insert",
            Command::Select { .. } => "select",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
        }
    }
}

/// Success flag plus the human-readable status text of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Whether the command completed
    pub success: bool,
    /// Status line(s), or `Error: ...` on failure
    pub message: String,
    /// Structured result, present on success
    pub outcome: Option<Outcome>,
}

impl Report {
    pub(crate) fn ok(outcome: Outcome) -> Self {
        Self {
            success: true,
            message: outcome.to_string(),
            outcome: Some(outcome),
        }
    }

    pub(crate) fn failed(error: &tablestore_core::Error) -> Self {
        Self {
            success: false,
            message: format!("Error: {}.", error),
            outcome: None,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
