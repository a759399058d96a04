//! Statement outcomes and their text rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one column cell in rendered result sets
const CELL_WIDTH: usize = 15;
/// Rule printed above and below listings
const LISTING_RULE: &str = "--------------------";

/// Rows produced by a SELECT
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// Projected column names, in output order
    pub columns: Vec<String>,
    /// Projected fields of each matching record, in storage order
    pub rows: Vec<Vec<String>>,
}

impl ResultSet {
    /// Number of matching rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn write_cells(f: &mut fmt::Formatter<'_>, cells: &[String]) -> fmt::Result {
    let line: String = cells
        .iter()
        .map(|cell| format!("{:<width$}", cell, width = CELL_WIDTH))
        .collect();
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cells(f, &self.columns)?;
        writeln!(f, "{}", "-".repeat(CELL_WIDTH * self.columns.len()))?;
        for row in &self.rows {
            write_cells(f, row)?;
        }
        write!(f, "{} row(s) in set", self.rows.len())
    }
}

/// Successful result of one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A single status line
    Done(String),
    /// A titled list of names with a count, as printed by SHOW
    Listing {
        /// Heading line
        title: String,
        /// Listed names
        items: Vec<String>,
        /// Singular noun used in the count line
        noun: &'static str,
    },
    /// SELECT results
    Rows(ResultSet),
    /// Rows touched by UPDATE or DELETE
    Affected {
        /// Number of rows
        count: usize,
        /// Past-tense verb for the status line
        verb: &'static str,
    },
}

impl Outcome {
    pub(crate) fn done(message: impl Into<String>) -> Self {
        Outcome::Done(message.into())
    }

    /// The result set, for SELECT outcomes
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            Outcome::Rows(set) => Some(set),
            _ => None,
        }
    }

    /// Rows matched by SELECT, UPDATE or DELETE
    pub fn row_count(&self) -> Option<usize> {
        match self {
            Outcome::Rows(set) => Some(set.len()),
            Outcome::Affected { count, .. } => Some(*count),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done(message) => write!(f, "{}", message),
            Outcome::Listing { title, items, noun } => {
                writeln!(f, "{}", title)?;
                writeln!(f, "{}", LISTING_RULE)?;
                for item in items {
                    writeln!(f, "{}", item)?;
                }
                writeln!(f, "{}", LISTING_RULE)?;
                write!(f, "{} {}(s)", items.len(), noun)
            }
            Outcome::Rows(set) => write!(f, "{}", set),
            Outcome::Affected { count, verb } => write!(f, "{} row(s) {}.", count, verb),
        }
    }
}
