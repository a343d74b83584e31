use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    /// Maps a unique-constraint violation (SQLSTATE 23505) to `AlreadyExists`,
    /// leaving every other driver error untouched.
    pub fn from_unique_violation(err: SqlxError, message: &str) -> Self {
        match &err {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::AlreadyExists(message.to_string())
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}
