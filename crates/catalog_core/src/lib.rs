//! Core domain logic for the library catalog.
//! This crate is the single source of truth for business invariants.

pub mod catalog;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod wire;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{Author, NewAuthor};
pub use model::book::{Book, NewBook};
pub use model::tag::Tag;
pub use model::{AuthorId, BookId, Identified, TagId, ValidationError};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::snapshot::load_catalog;
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::{RepoError, RepoResult};
pub use service::author_service::{AuthorService, AuthorServiceError};
pub use service::book_service::{BookService, BookServiceError, BookServiceResult};
pub use service::catalog_stats;
pub use service::tag_service::{TagService, TagServiceError};
pub use wire::{BookDocument, CatalogStats};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
