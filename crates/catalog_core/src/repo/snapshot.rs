//! Hydration of an in-memory catalog from SQLite.
//!
//! # Invariants
//! - Ids are preserved, so the catalog and the database agree on identity.
//! - Links are replayed through the association manager, so the result is
//!   symmetric even if the link tables were written by another tool.

use super::author_repo::{AuthorRepository, SqliteAuthorRepository};
use super::book_repo::{BookRepository, SqliteBookRepository};
use super::tag_repo::{SqliteTagRepository, TagRepository};
use super::{RepoError, RepoResult};
use crate::catalog::{Catalog, CatalogError};
use crate::model::author::NewAuthor;
use crate::model::book::NewBook;
use log::info;
use rusqlite::Connection;
use std::time::Instant;

/// Loads every book, author, tag and link into a fresh [`Catalog`].
pub fn load_catalog(conn: &Connection) -> RepoResult<Catalog> {
    let started_at = Instant::now();
    let books = SqliteBookRepository::try_new(conn)?.list_books()?;
    let authors = SqliteAuthorRepository::try_new(conn)?.list_authors()?;
    let tags = SqliteTagRepository::try_new(conn)?.list_tags()?;

    let mut catalog = Catalog::new();
    for author in &authors {
        let draft = NewAuthor::new(author.first_name(), author.last_name(), author.birth_year())
            .with_id(author.id());
        catalog.insert_author(draft).map_err(invalid)?;
    }
    for tag in &tags {
        catalog.insert_tag_with_id(tag.id(), tag.name()).map_err(invalid)?;
    }
    for book in &books {
        let draft =
            NewBook::new(book.title(), book.year(), book.number_of_pages()).with_id(book.id());
        catalog.insert_book(draft).map_err(invalid)?;
        for author in book.author_ids() {
            catalog.add_author(book.id(), author).map_err(invalid)?;
        }
        for tag in book.tag_ids() {
            catalog.add_tag(book.id(), tag).map_err(invalid)?;
        }
    }

    info!(
        "event=catalog_load module=repo status=ok books={} authors={} tags={} duration_ms={}",
        catalog.book_count(),
        catalog.author_count(),
        catalog.tag_count(),
        started_at.elapsed().as_millis()
    );
    Ok(catalog)
}

fn invalid(err: CatalogError) -> RepoError {
    RepoError::InvalidData(err.to_string())
}
