//! Author entity.

use super::book::Book;
use super::{AuthorId, BookId, Identified};
use crate::catalog::association::{has_association, snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// An author of one or more books.
///
/// Serialized without the book set; books reference authors, not the other
/// way around, on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    id: AuthorId,
    #[serde(rename = "firstname")]
    first_name: String,
    last_name: String,
    birth_year: i32,
    #[serde(skip)]
    pub(crate) books: BTreeSet<BookId>,
}

impl Author {
    pub fn new(
        id: AuthorId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_year: i32,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_year,
            books: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> AuthorId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn set_birth_year(&mut self, birth_year: i32) {
        self.birth_year = birth_year;
    }

    /// Returns a copy of the linked book ids.
    pub fn book_ids(&self) -> BTreeSet<BookId> {
        snapshot::<_, Book>(self)
    }

    pub fn has_written(&self, book: BookId) -> bool {
        has_association::<_, Book>(self, book)
    }

    pub(crate) fn clear_links(&mut self) {
        self.books.clear();
    }
}

impl Identified for Author {
    type Id = AuthorId;

    fn id(&self) -> AuthorId {
        self.id
    }
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.birth_year == other.birth_year
            && self.first_name == other.first_name
            && self.last_name == other.last_name
    }
}

impl Eq for Author {}

impl Hash for Author {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.first_name.hash(state);
        self.last_name.hash(state);
        self.birth_year.hash(state);
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Author{{id={}, firstname='{}', lastName='{}', birthYear={}, books={}}}",
            self.id,
            self.first_name,
            self.last_name,
            self.birth_year,
            self.books.len()
        )
    }
}

/// Create/update payload for an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuthorId>,
    #[serde(default, rename = "firstname")]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub birth_year: i32,
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, birth_year: i32) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_year,
        }
    }

    pub fn with_id(mut self, id: AuthorId) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn into_author(self, id: AuthorId) -> Author {
        Author::new(id, self.first_name, self.last_name, self.birth_year)
    }
}

#[cfg(test)]
mod tests {
    use super::Author;
    use crate::model::{AuthorId, BookId};

    #[test]
    fn equality_ignores_associations() {
        let plain = Author::new(AuthorId(1), "F. Scott", "Fitzgerald", 1896);
        let mut linked = plain.clone();
        linked.books.insert(BookId(7));
        assert_eq!(plain, linked);
    }

    #[test]
    fn equality_checks_every_scalar_field() {
        let base = Author::new(AuthorId(1), "F. Scott", "Fitzgerald", 1896);
        assert_ne!(base, Author::new(AuthorId(2), "F. Scott", "Fitzgerald", 1896));
        assert_ne!(base, Author::new(AuthorId(1), "Zelda", "Fitzgerald", 1896));
        assert_ne!(base, Author::new(AuthorId(1), "F. Scott", "Key", 1896));
        assert_ne!(base, Author::new(AuthorId(1), "F. Scott", "Fitzgerald", 1900));
    }
}
