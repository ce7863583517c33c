use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("email already in use")]
    DuplicateEmail,

    #[error("user {0} not found")]
    NotFound(i64),

    #[error("missing user id")]
    MissingId,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no fields to update")]
    NothingToUpdate,

    #[error("cannot remove the last active administrator")]
    LastAdmin,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Maps a UNIQUE violation (only `users.email` is unique) to
    /// [`AccountError::DuplicateEmail`].
    pub(crate) fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                AccountError::DuplicateEmail
            }
            other => AccountError::Store(other),
        }
    }
}

/// A role or status string that is not recognised.
#[derive(Debug, Error)]
#[error("unknown value: {0:?}")]
pub struct UnknownVariant(pub String);
