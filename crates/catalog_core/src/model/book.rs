//! Book entity.
//!
//! # Invariants
//! - `authors`/`tags` hold ids only and are mutated solely by the catalog
//!   association manager or by repository hydration.
//! - `PartialEq`/`Hash` compare `id`, `title`, `year`, `number_of_pages`.

use super::author::Author;
use super::tag::Tag;
use super::{AuthorId, BookId, Identified, TagId, ValidationError};
use crate::catalog::association::{has_association, snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    year: i32,
    number_of_pages: i32,
    #[serde(skip)]
    pub(crate) authors: BTreeSet<AuthorId>,
    #[serde(skip)]
    pub(crate) tags: BTreeSet<TagId>,
}

impl Book {
    /// Creates a book with no associations.
    pub fn new(id: BookId, title: impl Into<String>, year: i32, number_of_pages: i32) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            number_of_pages,
            authors: BTreeSet::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number_of_pages(&self) -> i32 {
        self.number_of_pages
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn set_number_of_pages(&mut self, number_of_pages: i32) {
        self.number_of_pages = number_of_pages;
    }

    /// Returns a copy of the linked author ids.
    pub fn author_ids(&self) -> BTreeSet<AuthorId> {
        snapshot::<_, Author>(self)
    }

    /// Returns a copy of the linked tag ids.
    pub fn tag_ids(&self) -> BTreeSet<TagId> {
        snapshot::<_, Tag>(self)
    }

    pub fn has_author(&self, author: AuthorId) -> bool {
        has_association::<_, Author>(self, author)
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        has_association::<_, Tag>(self, tag)
    }

    /// Rejects titles that are empty after trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    pub(crate) fn clear_links(&mut self) {
        self.authors.clear();
        self.tags.clear();
    }
}

impl Identified for Book {
    type Id = BookId;

    fn id(&self) -> BookId {
        self.id
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.year == other.year
            && self.number_of_pages == other.number_of_pages
            && self.title == other.title
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.title.hash(state);
        self.year.hash(state);
        self.number_of_pages.hash(state);
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Book{{id={}, title='{}', year={}, numberOfPages={}, authors={}, tags={}}}",
            self.id,
            self.title,
            self.year,
            self.number_of_pages,
            self.authors.len(),
            self.tags.len()
        )
    }
}

/// Create/update payload for a book.
///
/// `id` is optional on create; when absent the store assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub number_of_pages: i32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, year: i32, number_of_pages: i32) -> Self {
        Self {
            id: None,
            title: title.into(),
            year,
            number_of_pages,
        }
    }

    /// Sets a caller-supplied id.
    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book::new(id, self.title, self.year, self.number_of_pages)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}
