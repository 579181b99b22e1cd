//! Book use-case service.
//!
//! # Responsibility
//! - Provide book CRUD with boundary validation.
//! - Expose author and tag association changes by id.
//!
//! # Invariants
//! - Titles must not be blank on create or update.
//! - An update must not produce two books with the same `(title, year)`.
//! - Returned books are read back from storage after every write.

use crate::model::book::{Book, NewBook};
use crate::model::tag::Tag;
use crate::model::{AuthorId, BookId, TagId, ValidationError};
use crate::repo::book_repo::BookRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// Title is missing or blank.
    InvalidTitle,
    /// Tag name is blank.
    InvalidTag(String),
    /// Another book already has this title and year.
    DuplicateTitleYear { title: String, year: i32 },
    DuplicateBookId(BookId),
    BookNotFound(BookId),
    AuthorNotFound(AuthorId),
    TagNotFound(TagId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title can't be null or empty"),
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::DuplicateTitleYear { title, year } => {
                write!(f, "a book titled `{title}` from {year} already exists")
            }
            Self::DuplicateBookId(id) => write!(f, "book with id {id} already exists"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BookNotFound(id) => Self::BookNotFound(id),
            RepoError::AuthorNotFound(id) => Self::AuthorNotFound(id),
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            RepoError::DuplicateBookId(id) => Self::DuplicateBookId(id),
            RepoError::Validation(ValidationError::EmptyTitle) => Self::InvalidTitle,
            other => Self::Repo(other),
        }
    }
}

pub type BookServiceResult<T> = Result<T, BookServiceError>;

/// Book service facade over repository implementations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a book and returns the stored record.
    pub fn create_book(&self, draft: NewBook) -> BookServiceResult<Book> {
        if draft.validate().is_err() {
            warn!("event=book_create module=service status=rejected reason=invalid_title");
            return Err(BookServiceError::InvalidTitle);
        }

        let id = self.repo.create_book(&draft)?;
        info!("event=book_create module=service status=ok book_id={id}");
        self.read_back(id, "created book not found in read-back")
    }

    pub fn get_book(&self, id: BookId) -> BookServiceResult<Book> {
        self.repo
            .get_book(id)?
            .ok_or(BookServiceError::BookNotFound(id))
    }

    pub fn list_books(&self) -> BookServiceResult<Vec<Book>> {
        Ok(self.repo.list_books()?)
    }

    /// Replaces the scalar fields of book `id` with `draft`.
    ///
    /// `draft.id` is ignored; the path id wins.
    pub fn update_book(&self, id: BookId, draft: NewBook) -> BookServiceResult<Book> {
        if self.repo.get_book(id)?.is_none() {
            return Err(BookServiceError::BookNotFound(id));
        }
        if draft.validate().is_err() {
            warn!("event=book_update module=service status=rejected reason=invalid_title book_id={id}");
            return Err(BookServiceError::InvalidTitle);
        }
        let clash = self
            .repo
            .find_by_title_year(&draft.title, draft.year)?
            .into_iter()
            .any(|other| other != id);
        if clash {
            return Err(BookServiceError::DuplicateTitleYear {
                title: draft.title,
                year: draft.year,
            });
        }

        let book = Book::new(id, draft.title, draft.year, draft.number_of_pages);
        self.repo.update_book(&book)?;
        info!("event=book_update module=service status=ok book_id={id}");
        self.read_back(id, "updated book not found in read-back")
    }

    pub fn delete_book(&self, id: BookId) -> BookServiceResult<()> {
        self.repo.delete_book(id)?;
        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(())
    }

    pub fn book_count(&self) -> BookServiceResult<u64> {
        Ok(self.repo.count_books()?)
    }

    /// Links an author; `false` when the link already existed.
    pub fn add_author(&self, book: BookId, author: AuthorId) -> BookServiceResult<bool> {
        Ok(self.repo.link_author(book, author)?)
    }

    /// Unlinks an author; `false` when there was no link.
    pub fn remove_author(&self, book: BookId, author: AuthorId) -> BookServiceResult<bool> {
        Ok(self.repo.unlink_author(book, author)?)
    }

    pub fn add_tag(&self, book: BookId, tag: TagId) -> BookServiceResult<bool> {
        Ok(self.repo.link_tag(book, tag)?)
    }

    pub fn remove_tag(&self, book: BookId, tag: TagId) -> BookServiceResult<bool> {
        Ok(self.repo.unlink_tag(book, tag)?)
    }

    /// Tags a book by name, reusing an existing tag with that name.
    pub fn add_tag_by_name(&self, book: BookId, name: &str) -> BookServiceResult<Tag> {
        if name.trim().is_empty() {
            return Err(BookServiceError::InvalidTag(name.to_string()));
        }
        Ok(self.repo.tag_book_by_name(book, name)?)
    }

    fn read_back(&self, id: BookId, details: &'static str) -> BookServiceResult<Book> {
        self.repo
            .get_book(id)?
            .ok_or(BookServiceError::InconsistentState(details))
    }
}
