use axum::{
    Router,
    routing::{get, post},
};

use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{login, login_form, register};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/registration/", post(register))
        .route("/login/", get(login_form).post(login))
}
