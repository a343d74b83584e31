use crate::errors::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(RepositoryError),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to update item {id} (index {index}): {source}")]
    BulkItemFailed {
        index: usize,
        id: i32,
        source: Box<ServiceError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![message.into()])
    }

    /// The error that decides how a caller should branch; for bulk failures
    /// this is the failing item's own error.
    pub fn root(&self) -> &ServiceError {
        match self {
            ServiceError::BulkItemFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Repo(other),
        }
    }
}
