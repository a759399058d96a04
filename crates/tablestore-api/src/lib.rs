//! # tablestore
//!
//! A minimal single-user table store. Databases are directories, tables are
//! comma-delimited flat files with a `name TYPE size` schema sidecar, and a
//! small executor runs CREATE/DROP, INSERT, SELECT, UPDATE and DELETE with a
//! restricted WHERE clause.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tablestore::{Command, Engine, EngineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::open(EngineConfig::new("./data"))?;
//!
//!     for command in [
//!         Command::CreateDatabase { name: "school".into() },
//!         Command::UseDatabase { name: "school".into() },
//!         Command::CreateTable {
//!             name: "students".into(),
//!             columns: "id INT, name CHAR(20), age INT".into(),
//!         },
//!         Command::insert("students", "1,Alice,20"),
//!         Command::insert("students", "2,Bob,25"),
//!         Command::select("students", "name,age", "age > 20"),
//!     ] {
//!         let report = engine.execute(command);
//!         println!("{}", report);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## WHERE clauses
//!
//! The WHERE grammar is a flat AND of ORs: ` AND ` and ` OR ` (upper case,
//! single spaces) split the clause, parentheses are ignored, and each term is
//! `column op value` with `op` one of `!=`, `=`, `>`, `<`. See
//! [`Condition`] for details.
//!
//! ## On-disk format
//!
//! ```text
//! <data_dir>/<db>/<table>.table       1,Alice,20
//! <data_dir>/<db>/<table>.table.info  id INT 4
//! ```
//!
//! Field values cannot contain commas or line breaks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command;
pub mod config;
pub mod engine;
pub mod logging;
pub mod result;

pub use command::{Command, Report};
pub use config::EngineConfig;
pub use engine::Engine;
pub use result::{Outcome, ResultSet};

// Re-export core types
pub use tablestore_core::{
    parse_column_defs, Column, ColumnType, Comparison, ComparisonOp, Condition, Error, ObjectKind,
    Predicate, Record, Result, TableSchema,
};

// Storage components
pub use tablestore_storage::{Catalog, RecordStore, SchemaCodec, StorageConfig, SyncMode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
