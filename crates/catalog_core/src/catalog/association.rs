//! Symmetric many-to-many link bookkeeping.
//!
//! # Responsibility
//! - Keep both sides of an association consistent from one call site.
//!
//! # Invariants
//! - After `add_association(a, b)`, `a` lists `b` and `b` lists `a`.
//! - After `remove_association(a, b)`, neither side lists the other.
//! - The mirror side is touched only when its state disagrees, so a second
//!   call never cascades back into the first side.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::tag::Tag;
use crate::model::{AuthorId, BookId, Identified, TagId};
use std::collections::BTreeSet;

/// An entity that keeps the ids of its `R` partners.
pub(crate) trait Linked<R: Identified>: Identified {
    fn links(&self) -> &BTreeSet<R::Id>;
    fn links_mut(&mut self) -> &mut BTreeSet<R::Id>;
}

impl Linked<Author> for Book {
    fn links(&self) -> &BTreeSet<AuthorId> {
        &self.authors
    }

    fn links_mut(&mut self) -> &mut BTreeSet<AuthorId> {
        &mut self.authors
    }
}

impl Linked<Tag> for Book {
    fn links(&self) -> &BTreeSet<TagId> {
        &self.tags
    }

    fn links_mut(&mut self) -> &mut BTreeSet<TagId> {
        &mut self.tags
    }
}

impl Linked<Book> for Author {
    fn links(&self) -> &BTreeSet<BookId> {
        &self.books
    }

    fn links_mut(&mut self) -> &mut BTreeSet<BookId> {
        &mut self.books
    }
}

impl Linked<Book> for Tag {
    fn links(&self) -> &BTreeSet<BookId> {
        &self.books
    }

    fn links_mut(&mut self) -> &mut BTreeSet<BookId> {
        &mut self.books
    }
}

/// Links `related` to `owner` and mirrors the link when it is missing.
///
/// Returns whether the forward side changed.
pub(crate) fn add_association<O, R>(owner: &mut O, related: &mut R) -> bool
where
    O: Linked<R>,
    R: Linked<O>,
{
    let added = owner.links_mut().insert(related.id());
    if !has_association::<R, O>(&*related, owner.id()) {
        related.links_mut().insert(owner.id());
    }
    added
}

/// Unlinks `related` from `owner` and drops the mirror link when present.
///
/// Returns whether the forward side changed.
pub(crate) fn remove_association<O, R>(owner: &mut O, related: &mut R) -> bool
where
    O: Linked<R>,
    R: Linked<O>,
{
    let removed = owner.links_mut().remove(&related.id());
    if has_association::<R, O>(&*related, owner.id()) {
        related.links_mut().remove(&owner.id());
    }
    removed
}

pub(crate) fn has_association<O, R>(owner: &O, related: R::Id) -> bool
where
    O: Linked<R>,
    R: Identified,
{
    owner.links().contains(&related)
}

/// Defensive copy of the owner's link set.
pub(crate) fn snapshot<O, R>(owner: &O) -> BTreeSet<R::Id>
where
    O: Linked<R>,
    R: Identified,
{
    owner.links().clone()
}
