use thiserror::Error;

use crate::validate::ValidationError;

/// Error taxonomy for the repository and service layers.
///
/// Callers rely on the kind being preserved: handlers map `NotFound` to 404,
/// `BadRange` to 416 and `AlreadyExists` to 409. Store errors pass through
/// untouched so a caller can apply its own retry policy.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found")]
    NotFound,

    #[error("bad range: {0}")]
    BadRange(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] aws_sdk_dynamodb::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
