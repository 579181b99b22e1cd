//! Tag repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Tag names are trimmed before persistence and unique in storage.

use super::{ensure_connection_ready, is_constraint_violation, load_id_set, RepoError, RepoResult};
use crate::model::tag::{normalize_tag_name, Tag};
use crate::model::TagId;
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository interface for tag operations.
pub trait TagRepository {
    /// Creates a tag; fails with `DuplicateTagName` when the name is taken.
    fn create_tag(&self, name: &str) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Lists all tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    fn rename_tag(&self, id: TagId, name: &str) -> RepoResult<()>;
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
    fn count_tags(&self) -> RepoResult<u64>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, filter: &str, key: &dyn rusqlite::ToSql) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                &format!("SELECT id, name FROM tags WHERE {filter} = ?1;"),
                [key],
                |row| Ok(parse_tag_row(row)),
            )
            .optional()?;

        match tag {
            Some(tag) => Ok(Some(with_books(self.conn, tag?)?)),
            None => Ok(None),
        }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, name: &str) -> RepoResult<Tag> {
        let name = normalize_tag_name(name)?;
        match self
            .conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [&name])
        {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepoError::DuplicateTagName(name));
            }
            Err(err) => return Err(err.into()),
        }
        Ok(Tag::new(TagId(self.conn.last_insert_rowid()), &name)?)
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        self.query_one("id", &id)
    }

    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        self.query_one("name", &name.trim())
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(with_books(self.conn, parse_tag_row(row)?)?);
        }
        Ok(tags)
    }

    fn rename_tag(&self, id: TagId, name: &str) -> RepoResult<()> {
        let name = normalize_tag_name(name)?;
        let changed = match self.conn.execute(
            "UPDATE tags SET name = ?1 WHERE id = ?2;",
            rusqlite::params![name.as_str(), id],
        ) {
            Ok(changed) => changed,
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepoError::DuplicateTagName(name));
            }
            Err(err) => return Err(err.into()),
        };
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }

    fn count_tags(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    let id: TagId = row.get("id")?;
    let name: String = row.get("name")?;
    Tag::new(id, &name)
        .map_err(|_| RepoError::InvalidData(format!("blank name in tags.name for tag {id}")))
}

fn with_books(conn: &Connection, mut tag: Tag) -> RepoResult<Tag> {
    tag.books = load_id_set(
        conn,
        "SELECT book_id FROM book_tag WHERE tag_id = ?1;",
        &tag.id(),
    )?;
    Ok(tag)
}
