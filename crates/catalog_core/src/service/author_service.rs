//! Author use-case service.

use crate::model::author::{Author, NewAuthor};
use crate::model::AuthorId;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for author use-cases.
#[derive(Debug)]
pub enum AuthorServiceError {
    AuthorNotFound(AuthorId),
    DuplicateAuthorId(AuthorId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for AuthorServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::DuplicateAuthorId(id) => write!(f, "author with id {id} already exists"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent author state: {details}")
            }
        }
    }
}

impl Error for AuthorServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthorServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::AuthorNotFound(id) => Self::AuthorNotFound(id),
            RepoError::DuplicateAuthorId(id) => Self::DuplicateAuthorId(id),
            other => Self::Repo(other),
        }
    }
}

/// Author service facade over repository implementations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_author(&self, draft: NewAuthor) -> Result<Author, AuthorServiceError> {
        let id = self.repo.create_author(&draft)?;
        info!("event=author_create module=service status=ok author_id={id}");
        self.repo
            .get_author(id)?
            .ok_or(AuthorServiceError::InconsistentState(
                "created author not found in read-back",
            ))
    }

    pub fn get_author(&self, id: AuthorId) -> Result<Author, AuthorServiceError> {
        self.repo
            .get_author(id)?
            .ok_or(AuthorServiceError::AuthorNotFound(id))
    }

    pub fn list_authors(&self) -> Result<Vec<Author>, AuthorServiceError> {
        Ok(self.repo.list_authors()?)
    }

    /// Replaces the scalar fields of author `id`; `draft.id` is ignored.
    pub fn update_author(
        &self,
        id: AuthorId,
        draft: NewAuthor,
    ) -> Result<Author, AuthorServiceError> {
        let author = Author::new(id, draft.first_name, draft.last_name, draft.birth_year);
        self.repo.update_author(&author)?;
        self.get_author(id)
    }

    pub fn delete_author(&self, id: AuthorId) -> Result<(), AuthorServiceError> {
        self.repo.delete_author(id)?;
        info!("event=author_delete module=service status=ok author_id={id}");
        Ok(())
    }

    pub fn author_count(&self) -> Result<u64, AuthorServiceError> {
        Ok(self.repo.count_authors()?)
    }
}
