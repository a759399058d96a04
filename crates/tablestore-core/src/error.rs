//! Error types for tablestore.

use std::fmt;

/// Kind of catalog object an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A database directory
    Database,
    /// A table inside the current database
    Table,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Database => write!(f, "Database"),
            ObjectKind::Table => write!(f, "Table"),
        }
    }
}

/// The main error type for tablestore operations.
#[derive(Debug)]
pub enum Error {
    /// Referenced database or table is absent
    NotFound(ObjectKind, String),

    /// A create collided with an existing name
    AlreadyExists(ObjectKind, String),

    /// Input was rejected before touching the filesystem
    Validation(String),

    /// I/O error
    Io(std::io::Error),
}

impl Error {
    /// Shorthand for the "no database selected" validation failure.
    pub fn no_database_selected() -> Self {
        Error::Validation("No database selected".to_string())
    }

    /// Returns true for failures caused by the caller's input rather than the
    /// filesystem.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(kind, name) => write!(f, "{} '{}' does not exist", kind, name),
            Error::AlreadyExists(kind, name) => write!(f, "{} '{}' already exists", kind, name),
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// A specialized `Result` type for tablestore operations.
pub type Result<T> = std::result::Result<T, Error>;
