//! Catalog domain model.
//!
//! # Responsibility
//! - Define the entity records (`Book`, `Author`, `Tag`) and their ids.
//! - Provide field-level validation used by the service boundary.
//!
//! # Invariants
//! - Entities never hold references to each other, only id sets.
//! - Equality and hashing ignore association sets.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author;
pub mod book;
pub mod tag;

/// Gives an entity a stable, typed identity.
pub trait Identified {
    type Id: Copy + Ord + Display;

    fn id(&self) -> Self::Id;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer id.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.0))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                <i64 as rusqlite::types::FromSql>::column_result(value).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`book::Book`].
    BookId
);
entity_id!(
    /// Identifier of an [`author::Author`].
    AuthorId
);
entity_id!(
    /// Identifier of a [`tag::Tag`].
    TagId
);

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Book title is empty after trimming.
    EmptyTitle,
    /// Tag name is empty after trimming.
    BlankTagName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title can't be null or empty"),
            Self::BlankTagName => write!(f, "tag name is required"),
        }
    }
}

impl Error for ValidationError {}
