//! Table schemas and the column-definition grammar.
//!
//! A column definition list looks like `id INT, name CHAR(20), age INT`.
//! The same columns are persisted one per line as `name TYPE size` in the
//! table's `.table.info` sidecar; [`Column::to_sidecar_line`] and
//! [`Column::from_sidecar_line`] are the two directions of that format.

use crate::error::{Error, Result};
use crate::text::split_list;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width recorded for `INT` columns when no explicit size is given.
pub const INT_DEFAULT_SIZE: u32 = 4;
/// Width recorded for `CHAR` columns when no explicit size is given.
pub const CHAR_DEFAULT_SIZE: u32 = 255;

/// Declared column type. Advisory only: stored values are untyped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Integer column
    Int,
    /// Fixed-width character column
    Char,
}

impl ColumnType {
    /// Maps a type keyword from a column definition. Only an exact `CHAR`
    /// yields [`ColumnType::Char`]; every other keyword is treated as `INT`.
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword == "CHAR" {
            ColumnType::Char
        } else {
            ColumnType::Int
        }
    }

    /// Size used when the definition carries no `(N)` suffix.
    pub fn default_size(self) -> u32 {
        match self {
            ColumnType::Int => INT_DEFAULT_SIZE,
            ColumnType::Char => CHAR_DEFAULT_SIZE,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Char => write!(f, "CHAR"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub size: u32,
}

impl Column {
    /// Creates a column with the type's default size.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            size: column_type.default_size(),
        }
    }

    /// Overrides the declared size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Renders the sidecar line `name TYPE size`.
    pub fn to_sidecar_line(&self) -> String {
        format!("{} {} {}", self.name, self.column_type, self.size)
    }

    /// Best-effort parse of one sidecar line.
    ///
    /// Returns `None` for blank lines. A type other than `INT` loads as
    /// `CHAR`, and an unreadable size falls back to the type's default.
    pub fn from_sidecar_line(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        let column_type = match tokens.next() {
            Some("INT") => ColumnType::Int,
            _ => ColumnType::Char,
        };
        let size = tokens
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or_else(|| column_type.default_size());

        Some(Self {
            name: name.to_string(),
            column_type,
            size,
        })
    }

    /// Parses a single `<name> <TYPE>[(<size>)]` definition.
    pub fn parse_definition(definition: &str) -> Result<Self> {
        let mut tokens = definition.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| Error::Validation("Empty column definition".to_string()))?;
        let type_spec = tokens.next().unwrap_or("");

        match type_spec.find('(') {
            Some(open) => {
                let column_type = ColumnType::from_keyword(&type_spec[..open]);
                let inner = &type_spec[open + 1..];
                let size_text = inner.split(')').next().unwrap_or(inner);
                let size = size_text.parse::<u32>().map_err(|_| {
                    Error::Validation(format!(
                        "Invalid size '{}' for column '{}'",
                        size_text, name
                    ))
                })?;
                Ok(Column::new(name, column_type).with_size(size))
            }
            None => Ok(Column::new(name, ColumnType::from_keyword(type_spec))),
        }
    }
}

/// Parses a comma-separated column definition list.
///
/// Fails with [`Error::Validation`] on an empty list, an empty definition, a
/// non-numeric parenthesized size, or a repeated column name.
pub fn parse_column_defs(text: &str) -> Result<Vec<Column>> {
    let definitions = split_list(text, ',');
    if definitions.is_empty() {
        return Err(Error::Validation(
            "A table needs at least one column".to_string(),
        ));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(definitions.len());
    for definition in &definitions {
        let column = Column::parse_definition(definition)?;
        if columns.iter().any(|c| c.name == column.name) {
            return Err(Error::Validation(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }
        columns.push(column);
    }
    Ok(columns)
}

/// A table's name and its ordered columns. Column order is the on-disk
/// field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Position of `name` among the columns, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
