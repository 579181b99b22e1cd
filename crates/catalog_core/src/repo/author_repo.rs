//! Author repository contracts and SQLite implementation.

use super::{ensure_connection_ready, is_constraint_violation, load_id_set, RepoError, RepoResult};
use crate::model::author::{Author, NewAuthor};
use crate::model::AuthorId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    birth_year
FROM authors";

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    fn create_author(&self, draft: &NewAuthor) -> RepoResult<AuthorId>;
    fn update_author(&self, author: &Author) -> RepoResult<()>;
    /// Loads one author with the ids of the books they wrote.
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self) -> RepoResult<Vec<Author>>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
    fn count_authors(&self) -> RepoResult<u64>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, draft: &NewAuthor) -> RepoResult<AuthorId> {
        let inserted = self.conn.execute(
            "INSERT INTO authors (id, first_name, last_name, birth_year)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.id,
                draft.first_name.as_str(),
                draft.last_name.as_str(),
                draft.birth_year
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(match draft.id {
                    Some(id) => RepoError::DuplicateAuthorId(id),
                    None => err.into(),
                });
            }
            Err(err) => return Err(err.into()),
        }

        Ok(draft
            .id
            .unwrap_or_else(|| AuthorId(self.conn.last_insert_rowid())))
    }

    fn update_author(&self, author: &Author) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE authors
             SET
                first_name = ?1,
                last_name = ?2,
                birth_year = ?3
             WHERE id = ?4;",
            params![
                author.first_name(),
                author.last_name(),
                author.birth_year(),
                author.id()
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::AuthorNotFound(author.id()));
        }

        Ok(())
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_author_row,
            )
            .optional()?;

        match author {
            Some(author) => Ok(Some(with_books(self.conn, author)?)),
            None => Ok(None),
        }
    }

    fn list_authors(&self) -> RepoResult<Vec<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(with_books(self.conn, parse_author_row(row)?)?);
        }
        Ok(authors)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::AuthorNotFound(id));
        }
        Ok(())
    }

    fn count_authors(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author::new(
        row.get("id")?,
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get("birth_year")?,
    ))
}

fn with_books(conn: &Connection, mut author: Author) -> RepoResult<Author> {
    author.books = load_id_set(
        conn,
        "SELECT book_id FROM author_book WHERE author_id = ?1;",
        &author.id(),
    )?;
    Ok(author)
}
