//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate requests before they reach repositories.
//! - Translate repository misses into typed not-found errors.
//! - Keep CLI and other front ends decoupled from storage details.

use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::repo::tag_repo::TagRepository;
use crate::repo::RepoResult;
use crate::wire::CatalogStats;

pub mod author_service;
pub mod book_service;
pub mod tag_service;

/// Collects the counts shown on the catalog "about" view.
pub fn catalog_stats(
    books: &impl BookRepository,
    authors: &impl AuthorRepository,
    tags: &impl TagRepository,
) -> RepoResult<CatalogStats> {
    Ok(CatalogStats {
        book_count: books.count_books()?,
        author_count: authors.count_authors()?,
        tag_count: tags.count_tags()?,
    })
}
