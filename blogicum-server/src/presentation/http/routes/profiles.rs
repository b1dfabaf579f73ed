use axum::Router;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::profiles::{edit_profile, edit_profile_form, profile};

// `/profile/edit/` wins over a user literally named "edit".
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/edit/", get(edit_profile_form).post(edit_profile))
        .route("/profile/{username}/", get(profile))
}
