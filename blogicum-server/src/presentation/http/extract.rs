use std::future::Future;

use axum::{Json, extract::FromRequestParts, extract::rejection::JsonRejection};

use crate::domain::error::DomainError;
use crate::presentation::http::app_error::{AppError, AppResult};

/// `axum::extract::Path` whose mismatches answer with the JSON 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub(crate) struct Path<T>(pub(crate) T);

/// Opens a submitted JSON body. An unreadable body is reported only after
/// `gate` (the authentication and ownership checks of the target) has passed,
/// so anonymous and foreign submissions fail the same way with or without one.
pub(crate) async fn submitted<T, G>(
    body: Result<Json<T>, JsonRejection>,
    gate: impl Future<Output = Result<G, DomainError>>,
) -> AppResult<T> {
    match body {
        Ok(Json(dto)) => Ok(dto),
        Err(rejection) => {
            gate.await?;
            Err(rejection.into())
        }
    }
}
