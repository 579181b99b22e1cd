//! JSON document shapes exchanged with request/response layers.
//!
//! # Invariants
//! - Field names are camelCase (`numberOfPages`, `lastName`, `birthYear`),
//!   except `firstname`, which keeps its historical spelling.
//! - Authors and tags are inlined into book documents; the reverse
//!   direction is never serialized, so documents are always finite trees.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};

/// A book together with its linked authors and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDocument {
    #[serde(flatten)]
    pub book: Book,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl BookDocument {
    pub fn new(book: &Book, authors: Vec<Author>, tags: Vec<Tag>) -> Self {
        Self {
            book: book.clone(),
            authors,
            tags,
        }
    }
}

/// Summary counts shown on the catalog "about" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub book_count: u64,
    pub author_count: u64,
    pub tag_count: u64,
}
