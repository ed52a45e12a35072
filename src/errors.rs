// errors.rs
use thiserror::Error;

/// A rejected input: which field, and which constraint it broke.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: impl Into<String>) -> Self {
        Self {
            field,
            constraint: constraint.into(),
        }
    }
}

/// Errors raised by the persistence layer (SQLite or in-memory).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Only returned by operations whose contract is to fail on a missing id
    /// (replace, raw history insert). Lookups return `Ok(None)` instead.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The store is unreachable or rejected the read/write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}

/// What the domain services hand back to callers. Absence is not an error
/// at this level; it shows up as `Ok(None)` / `Ok(false)`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Payload Too Large: body exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ServerError::NotFound,
            StoreError::Storage(msg) => ServerError::DbError(msg),
        }
    }
}

impl From<ServiceError> for ServerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(v) => ServerError::Validation(v),
            ServiceError::Store(s) => s.into(),
        }
    }
}
