use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::database::StoreError;
use crate::models::FieldError;

/// Errors surfaced by handlers. `error_response` is the single place they
/// become HTTP responses, and the single place they are logged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("malformatted id")]
    Cast,

    #[error("{0}")]
    Validation(String),

    #[error("Password policy violated: {}", join_fields(.0))]
    PasswordPolicy(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: only the creator of a blog can delete it")]
    Forbidden,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Cast
            | AppError::Validation(_)
            | AppError::PasswordPolicy(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = if status.is_server_error() {
            log::error!("❌ {}", self);
            ErrorBody {
                error: "internal server error".to_string(),
                fields: None,
            }
        } else {
            log::warn!("⚠️  {}", self);
            ErrorBody {
                error: self.to_string(),
                fields: match self {
                    AppError::PasswordPolicy(fields) => Some(fields.as_slice()),
                    _ => None,
                },
            }
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { model, field, value } => AppError::Validation(format!(
                "{} validation failed: {}: Error, expected `{}` to be unique. Value: `{}`",
                model, field, field, value
            )),
            StoreError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(err.to_string())
    }
}
