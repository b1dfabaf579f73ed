use axum::{Json, Router, response::Response, routing::get};
use serde::Serialize;

use super::AppState;

pub(crate) mod app_error;
pub(crate) mod extract;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;


pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router())
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(middleware::auth::attach_login_next))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::resolve_viewer,
        ))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

async fn fallback_handler() -> Response {
    app_error::not_found()
}
