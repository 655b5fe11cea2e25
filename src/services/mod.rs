pub mod account_service;
pub mod blog_service;
pub mod person_service;

pub use account_service::AccountService;
pub use blog_service::BlogService;
pub use person_service::PersonService;

use thiserror::Error;

use crate::database::StoreError;

/// Closed set of outcomes a service operation can fail with
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error(transparent)]
    Store(StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MalformedId(_) => ServiceError::BadRequest("malformatted id".to_string()),
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::Conflict(msg) => ServiceError::BadRequest(msg),
            other => ServiceError::Store(other),
        }
    }
}

/// Trimmed, non-empty value of an optional request field
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
