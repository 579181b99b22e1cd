//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete per entity.
//! - Own the association link tables (`author_book`, `book_tag`).
//! - Hydrate an in-memory [`Catalog`](crate::catalog::Catalog) from storage.
//!
//! # Invariants
//! - Write paths validate entities before SQL mutations.
//! - Link tables are the single source of truth for both association
//!   directions, so loaded entities are always symmetric.
//! - Repositories only accept connections migrated to the latest version.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::{AuthorId, BookId, TagId, ValidationError};
use rusqlite::types::FromSql;
use rusqlite::{Connection, ErrorCode, ToSql};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;
pub mod snapshot;
pub mod tag_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all catalog repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    BookNotFound(BookId),
    AuthorNotFound(AuthorId),
    TagNotFound(TagId),
    DuplicateBookId(BookId),
    DuplicateAuthorId(AuthorId),
    DuplicateTagName(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::DuplicateBookId(id) => write!(f, "book with id {id} already exists"),
            Self::DuplicateAuthorId(id) => write!(f, "author with id {id} already exists"),
            Self::DuplicateTagName(name) => write!(f, "tag `{name}` already exists"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that were not opened through [`crate::db::open_db`].
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == ErrorCode::ConstraintViolation
    )
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: &dyn ToSql) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Collects one id column from a single-parameter query.
pub(crate) fn load_id_set<T>(conn: &Connection, sql: &str, key: &dyn ToSql) -> RepoResult<BTreeSet<T>>
where
    T: FromSql + Ord,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get(0)?);
    }
    Ok(ids)
}
