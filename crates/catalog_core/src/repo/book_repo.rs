//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide book CRUD over the `books` table.
//! - Own the `author_book` and `book_tag` link tables.
//!
//! # Invariants
//! - Link operations are idempotent and report whether a row changed.
//! - `tag_book_by_name` reuses an existing tag with the same name and runs
//!   in a single transaction.
//!
//! # See also
//! - `catalog::association` for the in-memory counterpart.

use super::{
    ensure_connection_ready, is_constraint_violation, load_id_set, row_exists, RepoError,
    RepoResult,
};
use crate::model::book::{Book, NewBook};
use crate::model::tag::{normalize_tag_name, Tag};
use crate::model::{AuthorId, BookId, TagId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    year,
    number_of_pages
FROM books";

/// Repository interface for books and their associations.
pub trait BookRepository {
    /// Inserts a book and returns its id (caller-supplied or generated).
    fn create_book(&self, draft: &NewBook) -> RepoResult<BookId>;
    /// Replaces scalar fields of an existing book.
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    /// Loads one book with its author and tag id sets.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists all books ordered by id.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Deletes one book; link rows go with it.
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    fn count_books(&self) -> RepoResult<u64>;
    /// Ids of books with exactly this title and year.
    fn find_by_title_year(&self, title: &str, year: i32) -> RepoResult<Vec<BookId>>;
    fn link_author(&self, book: BookId, author: AuthorId) -> RepoResult<bool>;
    fn unlink_author(&self, book: BookId, author: AuthorId) -> RepoResult<bool>;
    fn link_tag(&self, book: BookId, tag: TagId) -> RepoResult<bool>;
    fn unlink_tag(&self, book: BookId, tag: TagId) -> RepoResult<bool>;
    /// Gets or creates the tag named `name` and links it to `book`.
    fn tag_book_by_name(&self, book: BookId, name: &str) -> RepoResult<Tag>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn ensure_book(&self, id: BookId) -> RepoResult<()> {
        if !row_exists(self.conn, "books", &id)? {
            return Err(RepoError::BookNotFound(id));
        }
        Ok(())
    }

    fn ensure_author(&self, id: AuthorId) -> RepoResult<()> {
        if !row_exists(self.conn, "authors", &id)? {
            return Err(RepoError::AuthorNotFound(id));
        }
        Ok(())
    }

    fn ensure_tag(&self, id: TagId) -> RepoResult<()> {
        if !row_exists(self.conn, "tags", &id)? {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, draft: &NewBook) -> RepoResult<BookId> {
        draft.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO books (id, title, year, number_of_pages)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.id,
                draft.title.as_str(),
                draft.year,
                draft.number_of_pages
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(match draft.id {
                    Some(id) => RepoError::DuplicateBookId(id),
                    None => err.into(),
                });
            }
            Err(err) => return Err(err.into()),
        }

        Ok(draft
            .id
            .unwrap_or_else(|| BookId(self.conn.last_insert_rowid())))
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                year = ?2,
                number_of_pages = ?3
             WHERE id = ?4;",
            params![book.title(), book.year(), book.number_of_pages(), book.id()],
        )?;

        if changed == 0 {
            return Err(RepoError::BookNotFound(book.id()));
        }

        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;

        match book {
            Some(book) => Ok(Some(with_links(self.conn, book)?)),
            None => Ok(None),
        }
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(with_links(self.conn, parse_book_row(row)?)?);
        }
        Ok(books)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::BookNotFound(id));
        }
        Ok(())
    }

    fn count_books(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }

    fn find_by_title_year(&self, title: &str, year: i32) -> RepoResult<Vec<BookId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM books WHERE title = ?1 AND year = ?2 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query(params![title, year])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    fn link_author(&self, book: BookId, author: AuthorId) -> RepoResult<bool> {
        self.ensure_book(book)?;
        self.ensure_author(author)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO author_book (author_id, book_id) VALUES (?1, ?2);",
            params![author, book],
        )?;
        Ok(changed > 0)
    }

    fn unlink_author(&self, book: BookId, author: AuthorId) -> RepoResult<bool> {
        self.ensure_book(book)?;
        self.ensure_author(author)?;
        let changed = self.conn.execute(
            "DELETE FROM author_book WHERE author_id = ?1 AND book_id = ?2;",
            params![author, book],
        )?;
        Ok(changed > 0)
    }

    fn link_tag(&self, book: BookId, tag: TagId) -> RepoResult<bool> {
        self.ensure_book(book)?;
        self.ensure_tag(tag)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO book_tag (book_id, tag_id) VALUES (?1, ?2);",
            params![book, tag],
        )?;
        Ok(changed > 0)
    }

    fn unlink_tag(&self, book: BookId, tag: TagId) -> RepoResult<bool> {
        self.ensure_book(book)?;
        self.ensure_tag(tag)?;
        let changed = self.conn.execute(
            "DELETE FROM book_tag WHERE book_id = ?1 AND tag_id = ?2;",
            params![book, tag],
        )?;
        Ok(changed > 0)
    }

    fn tag_book_by_name(&self, book: BookId, name: &str) -> RepoResult<Tag> {
        let name = normalize_tag_name(name)?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "books", &book)? {
            return Err(RepoError::BookNotFound(book));
        }

        let created = tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1);", [&name])?;
        let tag_id: TagId =
            tx.query_row("SELECT id FROM tags WHERE name = ?1;", [&name], |row| {
                row.get(0)
            })?;
        tx.execute(
            "INSERT OR IGNORE INTO book_tag (book_id, tag_id) VALUES (?1, ?2);",
            params![book, tag_id],
        )?;
        let books = load_id_set(&tx, "SELECT book_id FROM book_tag WHERE tag_id = ?1;", &tag_id)?;
        tx.commit()?;

        debug!(
            "event=tag_book module=repo status=ok book_id={book} tag_id={tag_id} created_tag={}",
            created > 0
        );
        let mut tag = Tag::new(tag_id, &name)?;
        tag.books = books;
        Ok(tag)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book::new(
        row.get("id")?,
        row.get::<_, String>("title")?,
        row.get("year")?,
        row.get("number_of_pages")?,
    ))
}

fn with_links(conn: &Connection, mut book: Book) -> RepoResult<Book> {
    let id = book.id();
    book.authors = load_id_set(
        conn,
        "SELECT author_id FROM author_book WHERE book_id = ?1;",
        &id,
    )?;
    book.tags = load_id_set(conn, "SELECT tag_id FROM book_tag WHERE book_id = ?1;", &id)?;
    Ok(book)
}
