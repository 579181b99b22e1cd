//! Tag use-case service.
//!
//! # Invariants
//! - Blank names are rejected before reaching storage.
//! - Name collisions surface as `DuplicateTagName`, never as a raw
//!   constraint error.

use crate::model::tag::Tag;
use crate::model::{TagId, ValidationError};
use crate::repo::tag_repo::TagRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tag use-cases.
#[derive(Debug)]
pub enum TagServiceError {
    InvalidTag(String),
    DuplicateTagName(String),
    TagNotFound(TagId),
    Repo(RepoError),
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::DuplicateTagName(name) => write!(f, "tag `{name}` already exists"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TagNotFound(id) => Self::TagNotFound(id),
            RepoError::DuplicateTagName(name) => Self::DuplicateTagName(name),
            other => Self::Repo(other),
        }
    }
}

/// Tag service facade over repository implementations.
pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_tag(&self, name: &str) -> Result<Tag, TagServiceError> {
        self.repo.create_tag(name).map_err(|err| invalid_or(err, name))
    }

    pub fn get_tag(&self, id: TagId) -> Result<Tag, TagServiceError> {
        self.repo
            .get_tag(id)?
            .ok_or(TagServiceError::TagNotFound(id))
    }

    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>, TagServiceError> {
        Ok(self.repo.find_tag_by_name(name)?)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.repo.list_tags()?)
    }

    pub fn rename_tag(&self, id: TagId, name: &str) -> Result<Tag, TagServiceError> {
        self.repo
            .rename_tag(id, name)
            .map_err(|err| invalid_or(err, name))?;
        self.get_tag(id)
    }

    pub fn delete_tag(&self, id: TagId) -> Result<(), TagServiceError> {
        Ok(self.repo.delete_tag(id)?)
    }

    pub fn tag_count(&self) -> Result<u64, TagServiceError> {
        Ok(self.repo.count_tags()?)
    }
}

fn invalid_or(err: RepoError, name: &str) -> TagServiceError {
    match err {
        RepoError::Validation(ValidationError::BlankTagName) => {
            TagServiceError::InvalidTag(name.to_string())
        }
        other => other.into(),
    }
}
