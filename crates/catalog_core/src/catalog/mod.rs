//! In-memory catalog arena.
//!
//! # Responsibility
//! - Own every `Book`, `Author` and `Tag` keyed by id.
//! - Route association changes through the symmetric association manager.
//! - Sever every link of an entity when it is removed.
//!
//! # Invariants
//! - `book.authors ∋ a` iff `author(a).books ∋ book.id`.
//! - `book.tags ∋ t` iff `tag(t).books ∋ book.id`.
//! - Tag names are unique within one catalog.
//! - Mutating operations with an unknown id fail without mutating anything.
//!
//! The catalog has no internal locking; callers that share it across
//! threads must serialize writers (for example behind a `Mutex`).

use crate::model::author::{Author, NewAuthor};
use crate::model::book::{Book, NewBook};
use crate::model::tag::{normalize_tag_name, Tag};
use crate::model::{AuthorId, BookId, TagId, ValidationError};
use crate::wire::BookDocument;
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) mod association;

use association::{add_association, has_association, remove_association};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by catalog mutations.
///
/// `Unknown*` variants mean the caller passed an id the catalog does not
/// hold, which is a contract violation rather than a business condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownBook(BookId),
    UnknownAuthor(AuthorId),
    UnknownTag(TagId),
    DuplicateBookId(BookId),
    DuplicateAuthorId(AuthorId),
    DuplicateTagId(TagId),
    DuplicateTagName(String),
    /// No id above the largest stored one is left for this entity kind.
    IdSpaceExhausted(&'static str),
    Validation(ValidationError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBook(id) => write!(f, "book {id} is not in the catalog"),
            Self::UnknownAuthor(id) => write!(f, "author {id} is not in the catalog"),
            Self::UnknownTag(id) => write!(f, "tag {id} is not in the catalog"),
            Self::DuplicateBookId(id) => write!(f, "book with id {id} already exists"),
            Self::DuplicateAuthorId(id) => write!(f, "author with id {id} already exists"),
            Self::DuplicateTagId(id) => write!(f, "tag with id {id} already exists"),
            Self::DuplicateTagName(name) => write!(f, "tag `{name}` already exists"),
            Self::IdSpaceExhausted(entity) => write!(f, "no {entity} ids left to generate"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Arena of catalog entities with symmetric association bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: BTreeMap<BookId, Book>,
    authors: BTreeMap<AuthorId, Author>,
    tags: BTreeMap<TagId, Tag>,
    next_book_id: i64,
    next_author_id: i64,
    next_tag_id: i64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a book, using `draft.id` when present or a generated id.
    pub fn insert_book(&mut self, draft: NewBook) -> CatalogResult<BookId> {
        let id = match draft.id {
            Some(id) => id,
            None => BookId(next_id(self.next_book_id, "book")?),
        };
        if self.books.contains_key(&id) {
            return Err(CatalogError::DuplicateBookId(id));
        }
        self.next_book_id = self.next_book_id.max(id.get());
        self.books.insert(id, draft.into_book(id));
        Ok(id)
    }

    /// Inserts an author, using `draft.id` when present or a generated id.
    pub fn insert_author(&mut self, draft: NewAuthor) -> CatalogResult<AuthorId> {
        let id = match draft.id {
            Some(id) => id,
            None => AuthorId(next_id(self.next_author_id, "author")?),
        };
        if self.authors.contains_key(&id) {
            return Err(CatalogError::DuplicateAuthorId(id));
        }
        self.next_author_id = self.next_author_id.max(id.get());
        self.authors.insert(id, draft.into_author(id));
        Ok(id)
    }

    /// Inserts a tag with a generated id.
    pub fn insert_tag(&mut self, name: &str) -> CatalogResult<TagId> {
        let id = TagId(next_id(self.next_tag_id, "tag")?);
        self.insert_tag_with_id(id, name)
    }

    /// Inserts a tag with a caller-supplied id.
    pub fn insert_tag_with_id(&mut self, id: TagId, name: &str) -> CatalogResult<TagId> {
        if self.tags.contains_key(&id) {
            return Err(CatalogError::DuplicateTagId(id));
        }
        let tag = Tag::new(id, name)?;
        if self.tag_by_name(tag.name()).is_some() {
            return Err(CatalogError::DuplicateTagName(tag.name().to_string()));
        }
        self.next_tag_id = self.next_tag_id.max(id.get());
        self.tags.insert(id, tag);
        Ok(id)
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Mutable access for scalar field setters.
    pub fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_mut(&id)
    }

    pub fn author(&self, id: AuthorId) -> Option<&Author> {
        self.authors.get(&id)
    }

    pub fn author_mut(&mut self, id: AuthorId) -> Option<&mut Author> {
        self.authors.get_mut(&id)
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    /// Looks up a tag by trimmed, exact name.
    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        let name = name.trim();
        self.tags.values().find(|tag| tag.name() == name)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Renames a tag while keeping names unique.
    pub fn rename_tag(&mut self, id: TagId, name: &str) -> CatalogResult<()> {
        let name = normalize_tag_name(name)?;
        if !self.tags.contains_key(&id) {
            return Err(CatalogError::UnknownTag(id));
        }
        if let Some(existing) = self.tag_by_name(&name) {
            if existing.id() != id {
                return Err(CatalogError::DuplicateTagName(name));
            }
        }
        let books = self.tags.get(&id).map(Tag::book_ids).unwrap_or_default();
        let mut renamed = Tag::new(id, &name)?;
        renamed.books = books;
        self.tags.insert(id, renamed);
        Ok(())
    }

    /// Removes a book and severs its author and tag links.
    pub fn remove_book(&mut self, id: BookId) -> CatalogResult<Book> {
        let mut book = self.books.remove(&id).ok_or(CatalogError::UnknownBook(id))?;
        for author_id in &book.authors {
            if let Some(author) = self.authors.get_mut(author_id) {
                author.books.remove(&id);
            }
        }
        for tag_id in &book.tags {
            if let Some(tag) = self.tags.get_mut(tag_id) {
                tag.books.remove(&id);
            }
        }
        debug!(
            "event=catalog_remove module=catalog status=ok entity=book id={} authors={} tags={}",
            id,
            book.authors.len(),
            book.tags.len()
        );
        book.clear_links();
        Ok(book)
    }

    /// Removes an author and severs its book links.
    pub fn remove_author(&mut self, id: AuthorId) -> CatalogResult<Author> {
        let mut author = self
            .authors
            .remove(&id)
            .ok_or(CatalogError::UnknownAuthor(id))?;
        for book_id in &author.books {
            if let Some(book) = self.books.get_mut(book_id) {
                book.authors.remove(&id);
            }
        }
        debug!(
            "event=catalog_remove module=catalog status=ok entity=author id={} books={}",
            id,
            author.books.len()
        );
        author.clear_links();
        Ok(author)
    }

    /// Removes a tag and severs its book links.
    pub fn remove_tag(&mut self, id: TagId) -> CatalogResult<Tag> {
        let mut tag = self.tags.remove(&id).ok_or(CatalogError::UnknownTag(id))?;
        for book_id in &tag.books {
            if let Some(book) = self.books.get_mut(book_id) {
                book.tags.remove(&id);
            }
        }
        debug!(
            "event=catalog_remove module=catalog status=ok entity=tag id={} books={}",
            id,
            tag.books.len()
        );
        tag.clear_links();
        Ok(tag)
    }

    /// Links an author to a book on both sides.
    ///
    /// Returns `false` when the book already listed the author.
    pub fn add_author(&mut self, book: BookId, author: AuthorId) -> CatalogResult<bool> {
        let (book, author) = self.book_and_author(book, author)?;
        Ok(add_association(book, author))
    }

    /// Author-side twin of [`Catalog::add_author`].
    pub fn add_book_to_author(&mut self, author: AuthorId, book: BookId) -> CatalogResult<bool> {
        let (book, author) = self.book_and_author(book, author)?;
        Ok(add_association(author, book))
    }

    /// Unlinks an author from a book on both sides.
    ///
    /// Returns `false` when the book did not list the author.
    pub fn remove_author_from_book(
        &mut self,
        book: BookId,
        author: AuthorId,
    ) -> CatalogResult<bool> {
        let (book, author) = self.book_and_author(book, author)?;
        Ok(remove_association(book, author))
    }

    /// Author-side twin of [`Catalog::remove_author_from_book`].
    pub fn remove_book_from_author(
        &mut self,
        author: AuthorId,
        book: BookId,
    ) -> CatalogResult<bool> {
        let (book, author) = self.book_and_author(book, author)?;
        Ok(remove_association(author, book))
    }

    pub fn add_tag(&mut self, book: BookId, tag: TagId) -> CatalogResult<bool> {
        let (book, tag) = self.book_and_tag(book, tag)?;
        Ok(add_association(book, tag))
    }

    pub fn remove_tag_from_book(&mut self, book: BookId, tag: TagId) -> CatalogResult<bool> {
        let (book, tag) = self.book_and_tag(book, tag)?;
        Ok(remove_association(book, tag))
    }

    /// Tags a book by name, reusing an existing tag with the same name.
    ///
    /// A new tag with a generated id is created when none matches. Returns a
    /// copy of the linked tag.
    pub fn add_tag_by_name(&mut self, book: BookId, name: &str) -> CatalogResult<Tag> {
        let name = normalize_tag_name(name)?;
        if !self.books.contains_key(&book) {
            return Err(CatalogError::UnknownBook(book));
        }
        let tag_id = match self.tag_by_name(&name) {
            Some(existing) => existing.id(),
            None => self.insert_tag(&name)?,
        };
        let (book, tag) = self.book_and_tag(book, tag_id)?;
        add_association(book, tag);
        Ok(tag.clone())
    }

    /// Whether `book` lists `author`. Unknown ids yield `false`.
    pub fn has_author(&self, book: BookId, author: AuthorId) -> bool {
        self.books
            .get(&book)
            .is_some_and(|book| has_association::<_, Author>(book, author))
    }

    /// Whether `author` lists `book`. Unknown ids yield `false`.
    pub fn has_written(&self, author: AuthorId, book: BookId) -> bool {
        self.authors
            .get(&author)
            .is_some_and(|author| has_association::<_, Book>(author, book))
    }

    pub fn has_tag(&self, book: BookId, tag: TagId) -> bool {
        self.books
            .get(&book)
            .is_some_and(|book| has_association::<_, Tag>(book, tag))
    }

    /// Whether `book` carries a tag with the trimmed `name`.
    pub fn has_tag_named(&self, book: BookId, name: &str) -> bool {
        let Some(book) = self.books.get(&book) else {
            return false;
        };
        let name = name.trim();
        book.tags
            .iter()
            .filter_map(|id| self.tags.get(id))
            .any(|tag| tag.name() == name)
    }

    /// Copies of the authors linked to `book`, ordered by id.
    pub fn authors_of(&self, book: BookId) -> Vec<Author> {
        self.books
            .get(&book)
            .map(|book| {
                book.authors
                    .iter()
                    .filter_map(|id| self.authors.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copies of the books linked to `author`, ordered by id.
    pub fn books_of(&self, author: AuthorId) -> Vec<Book> {
        self.authors
            .get(&author)
            .map(|author| {
                author
                    .books
                    .iter()
                    .filter_map(|id| self.books.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copies of the tags linked to `book`, ordered by id.
    pub fn tags_of(&self, book: BookId) -> Vec<Tag> {
        self.books
            .get(&book)
            .map(|book| {
                book.tags
                    .iter()
                    .filter_map(|id| self.tags.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Copies of the books carrying `tag`, ordered by id.
    pub fn books_tagged(&self, tag: TagId) -> Vec<Book> {
        self.tags
            .get(&tag)
            .map(|tag| {
                tag.books
                    .iter()
                    .filter_map(|id| self.books.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Wire view of one book with its authors and tags inlined.
    pub fn book_document(&self, id: BookId) -> Option<BookDocument> {
        let book = self.books.get(&id)?;
        Some(BookDocument::new(book, self.authors_of(id), self.tags_of(id)))
    }

    /// Checks link symmetry and tag-name uniqueness across the arena.
    pub fn is_consistent(&self) -> bool {
        let books_ok = self.books.values().all(|book| {
            book.authors.iter().all(|id| {
                self.authors
                    .get(id)
                    .is_some_and(|author| author.books.contains(&book.id()))
            }) && book.tags.iter().all(|id| {
                self.tags
                    .get(id)
                    .is_some_and(|tag| tag.books.contains(&book.id()))
            })
        });
        let authors_ok = self.authors.values().all(|author| {
            author.books.iter().all(|id| {
                self.books
                    .get(id)
                    .is_some_and(|book| book.authors.contains(&author.id()))
            })
        });
        let tags_ok = self.tags.values().all(|tag| {
            tag.books.iter().all(|id| {
                self.books
                    .get(id)
                    .is_some_and(|book| book.tags.contains(&tag.id()))
            })
        });
        let mut names = self.tags.values().map(Tag::name).collect::<Vec<_>>();
        let total = names.len();
        names.sort_unstable();
        names.dedup();

        books_ok && authors_ok && tags_ok && names.len() == total
    }

    fn book_and_author(
        &mut self,
        book: BookId,
        author: AuthorId,
    ) -> CatalogResult<(&mut Book, &mut Author)> {
        let book = self
            .books
            .get_mut(&book)
            .ok_or(CatalogError::UnknownBook(book))?;
        let author = self
            .authors
            .get_mut(&author)
            .ok_or(CatalogError::UnknownAuthor(author))?;
        Ok((book, author))
    }

    fn book_and_tag(&mut self, book: BookId, tag: TagId) -> CatalogResult<(&mut Book, &mut Tag)> {
        let book = self
            .books
            .get_mut(&book)
            .ok_or(CatalogError::UnknownBook(book))?;
        let tag = self.tags.get_mut(&tag).ok_or(CatalogError::UnknownTag(tag))?;
        Ok((book, tag))
    }
}

fn next_id(current_max: i64, entity: &'static str) -> CatalogResult<i64> {
    current_max
        .max(0)
        .checked_add(1)
        .ok_or(CatalogError::IdSpaceExhausted(entity))
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError};
    use crate::model::author::NewAuthor;
    use crate::model::book::NewBook;
    use crate::model::{AuthorId, BookId, TagId};

    #[test]
    fn generated_ids_follow_the_largest_known_id() {
        let mut catalog = Catalog::new();
        let explicit = catalog
            .insert_book(NewBook::new("Dune", 1965, 412).with_id(BookId(10)))
            .unwrap();
        let generated = catalog.insert_book(NewBook::new("Emma", 1815, 474)).unwrap();
        assert_eq!(explicit, BookId(10));
        assert_eq!(generated, BookId(11));
    }

    #[test]
    fn generation_fails_once_the_largest_id_is_taken() {
        let mut catalog = Catalog::new();
        catalog
            .insert_book(NewBook::new("Last", 1, 1).with_id(BookId(i64::MAX)))
            .unwrap();

        let err = catalog.insert_book(NewBook::new("Next", 2, 2)).unwrap_err();
        assert_eq!(err, CatalogError::IdSpaceExhausted("book"));
        assert_eq!(catalog.book_count(), 1);
        assert_eq!(catalog.book(BookId(i64::MAX)).unwrap().title(), "Last");

        catalog
            .insert_author(NewAuthor::new("Last", "Author", 1).with_id(AuthorId(i64::MAX)))
            .unwrap();
        assert_eq!(
            catalog.insert_author(NewAuthor::new("Next", "Author", 2)).unwrap_err(),
            CatalogError::IdSpaceExhausted("author")
        );

        catalog.insert_tag_with_id(TagId(i64::MAX), "last").unwrap();
        assert_eq!(
            catalog.insert_tag("next").unwrap_err(),
            CatalogError::IdSpaceExhausted("tag")
        );
    }

    #[test]
    fn generated_id_never_replaces_a_stored_book() {
        let mut catalog = Catalog::new();
        let first = catalog.insert_book(NewBook::new("First", 1, 1)).unwrap();
        catalog.next_book_id = 0;

        let err = catalog.insert_book(NewBook::new("Second", 2, 2)).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateBookId(first));
        assert_eq!(catalog.book(first).unwrap().title(), "First");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = Catalog::new();
        catalog
            .insert_author(NewAuthor::new("Jane", "Austen", 1775).with_id(AuthorId(1)))
            .unwrap();
        let err = catalog
            .insert_author(NewAuthor::new("Frank", "Herbert", 1920).with_id(AuthorId(1)))
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateAuthorId(AuthorId(1)));
    }

    #[test]
    fn unknown_ids_do_not_mutate() {
        let mut catalog = Catalog::new();
        let book = catalog.insert_book(NewBook::new("Dune", 1965, 412)).unwrap();

        let err = catalog.add_author(book, AuthorId(42)).unwrap_err();
        assert_eq!(err, CatalogError::UnknownAuthor(AuthorId(42)));
        assert!(catalog.book(book).unwrap().author_ids().is_empty());

        let err = catalog.add_tag_by_name(BookId(9), "fiction").unwrap_err();
        assert_eq!(err, CatalogError::UnknownBook(BookId(9)));
        assert_eq!(catalog.tag_count(), 0);
    }

    #[test]
    fn rename_tag_keeps_links_and_rejects_collisions() {
        let mut catalog = Catalog::new();
        let book = catalog.insert_book(NewBook::new("Dune", 1965, 412)).unwrap();
        let scifi = catalog.add_tag_by_name(book, "scifi").unwrap();
        catalog.insert_tag_with_id(TagId(50), "classic").unwrap();

        catalog.rename_tag(scifi.id(), "science fiction").unwrap();
        assert!(catalog.has_tag_named(book, "science fiction"));
        assert!(catalog.tag(scifi.id()).unwrap().is_on(book));

        let err = catalog.rename_tag(scifi.id(), "classic").unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTagName("classic".to_string()));
        assert!(catalog.is_consistent());
    }
}
