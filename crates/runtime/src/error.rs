use thiserror::Error;

use crate::CatalogError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Error in the catalog request: {0}")]
    Upstream(String),

    // the driver message stays in the source chain and only reaches the logs
    #[error("storage failure")]
    Database(#[from] sqlx::Error),

    #[error("cache failure: {0}")]
    Cache(String),
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
