use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::domain::error::DomainError;
use crate::presentation::http::middleware::auth::LoginRequired;
use crate::presentation::http::routes::LOGIN_PATH;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unreadable request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("unmatched path parameters: {0}")]
    Path(#[from] PathRejection),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

pub(crate) type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }

    fn with_fields(fields: FieldErrors) -> Self {
        Self {
            error: "validation failed".to_string(),
            fields: Some(fields),
        }
    }
}

pub(crate) fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Domain(err) => domain_response(err),
            AppError::Validation(err) => {
                error_response(StatusCode::BAD_REQUEST, ErrorBody::with_fields(fields_of(&err)))
            }
            AppError::Body(rejection) => {
                error_response(rejection.status(), ErrorBody::new(rejection.body_text()))
            }
            // `/posts/abc/` names no post
            AppError::Path(PathRejection::FailedToDeserializePathParams(_)) => not_found(),
            AppError::Path(rejection) => {
                error!(error = %rejection, "path extraction failed");
                internal_error()
            }
        }
    }
}

fn domain_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation { field, message } => {
            let fields = BTreeMap::from([(field.to_string(), vec![message.to_string()])]);
            error_response(StatusCode::BAD_REQUEST, ErrorBody::with_fields(fields))
        }
        DomainError::NotFound(_) => not_found(),
        DomainError::AlreadyExists(_) => {
            error_response(StatusCode::CONFLICT, ErrorBody::new(err.to_string()))
        }
        DomainError::Forbidden(message) => {
            error_response(StatusCode::FORBIDDEN, ErrorBody::new(message))
        }
        DomainError::Unauthenticated => {
            let mut response = Redirect::to(LOGIN_PATH).into_response();
            response.extensions_mut().insert(LoginRequired);
            response
        }
        DomainError::InvalidCredentials => {
            error_response(StatusCode::UNAUTHORIZED, ErrorBody::new(err.to_string()))
        }
        DomainError::Unexpected(detail) => {
            error!(error = %detail, "request failed");
            internal_error()
        }
    }
}

/// Identifiers never leak into the 404 body.
pub(crate) fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, ErrorBody::new("not found"))
}

pub(crate) fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new("internal error"),
    )
}

fn fields_of(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => err.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
