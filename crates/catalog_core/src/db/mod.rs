//! Catalog database bootstrap.
//!
//! # Responsibility
//! - Open connections with cascading link deletes enabled.
//! - Bring the catalog schema to the version this binary understands and
//!   confirm every catalog table is present afterwards.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A connection handed out by this module has all of `CATALOG_TABLES`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Tables a migrated catalog database must contain.
pub const CATALOG_TABLES: &[&str] = &["books", "authors", "author_book", "tags", "book_tag"];

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating a catalog database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer catalog build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// One migration step failed; nothing from the batch was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// Migrations reported success but a catalog table is absent.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "catalog file uses schema {found}; this build reads up to {supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "catalog migration {version} ({name}) failed: {source}"),
            Self::MissingTable(table) => write!(f, "catalog table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
