use thiserror::Error;

// Catalog and bilingual source errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Fetch failure: {0}")]
    FetchFailure(String),
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

// Key-value persistence errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection pool error")]
    PoolError(#[from] r2d2::Error),
    #[error("Database error")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Serialization error")]
    SerializationError(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Other(String),
}

// Errors surfaced by the HTTP layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
