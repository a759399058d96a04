//! # tablestore Core
//!
//! Core types for tablestore, a single-user table store where databases are
//! directories and tables are comma-delimited flat files with a schema
//! sidecar.
//!
//! This crate holds everything that does not touch the filesystem: the error
//! taxonomy, table schemas and the column-definition parser, and the WHERE
//! condition evaluator.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
#[allow(missing_docs)]
pub mod schema;
pub mod text;

pub use error::{Error, ObjectKind, Result};
pub use query::{Comparison, ComparisonOp, Condition, Predicate};
pub use schema::{parse_column_defs, Column, ColumnType, TableSchema};

/// One data row: text fields positionally aligned to a table's columns.
pub type Record = Vec<String>;
