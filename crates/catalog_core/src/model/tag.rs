//! Tag entity.
//!
//! # Invariants
//! - `name` is trimmed and never blank.
//! - Uniqueness of `name` is a store-level concern (catalog or database).

use super::book::Book;
use super::{BookId, Identified, TagId, ValidationError};
use crate::catalog::association::{has_association, snapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A label attached to books.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
    #[serde(skip)]
    pub(crate) books: BTreeSet<BookId>,
}

impl Tag {
    /// Creates a tag after trimming and validating `name`.
    pub fn new(id: TagId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_tag_name(name)?,
            books: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the tagged book ids.
    pub fn book_ids(&self) -> BTreeSet<BookId> {
        snapshot::<_, Book>(self)
    }

    pub fn is_on(&self, book: BookId) -> bool {
        has_association::<_, Book>(self, book)
    }

    pub(crate) fn clear_links(&mut self) {
        self.books.clear();
    }
}

impl Identified for Tag {
    type Id = TagId;

    fn id(&self) -> TagId {
        self.id
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.name.hash(state);
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tag{{id={}, name='{}', booksCount={}}}",
            self.id,
            self.name,
            self.books.len()
        )
    }
}

/// Trims a tag name and rejects blank values.
pub fn normalize_tag_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTagName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag_name, Tag};
    use crate::model::{TagId, ValidationError};

    #[test]
    fn new_trims_name() {
        let tag = Tag::new(TagId(1), "  fiction ").unwrap();
        assert_eq!(tag.name(), "fiction");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            normalize_tag_name(" \t"),
            Err(ValidationError::BlankTagName)
        );
    }
}
