use axum::Router;

use crate::presentation::AppState;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod profiles;

pub(crate) const LOGIN_PATH: &str = "/auth/login/";

pub(crate) fn post_detail_path(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub(crate) fn profile_path(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .merge(profiles::router())
        .nest("/auth", auth::router())
}
