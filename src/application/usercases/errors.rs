use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::value_objects::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for UseCaseError {
    fn from(value: ValidationErrors) -> Self {
        UseCaseError::Validation(value)
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
