use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::profile_service::ProfileFeed;
use crate::domain::user::{ProfileFields, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::extract::{Path, submitted};
use crate::presentation::http::handlers::feeds::{PageQuery, PostPageDto};
use crate::presentation::http::middleware::auth::Viewer;
use crate::presentation::http::routes::profile_path;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PublicUserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for PublicUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    pub(crate) user: PublicUserDto,
    pub(crate) is_owner: bool,
    pub(crate) page: PostPageDto,
}

impl From<ProfileFeed> for ProfileDto {
    fn from(feed: ProfileFeed) -> Self {
        Self {
            user: feed.user.into(),
            is_owner: feed.is_owner,
            page: feed.page.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub(crate) struct ProfileFormDto {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
}

impl From<ProfileFields> for ProfileFormDto {
    fn from(fields: ProfileFields) -> Self {
        Self {
            username: fields.username,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
        }
    }
}

impl From<ProfileFormDto> for ProfileFields {
    fn from(dto: ProfileFormDto) -> Self {
        Self {
            username: dto.username,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
        }
    }
}

#[utoipa::path(
    get,
    path = "/profile/{username}/",
    tag = "profiles",
    params(
        ("username" = String, Path, description = "Profile owner"),
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Profile with its post feed", body = ProfileDto),
        (status = 404, description = "Unknown user"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfileDto>> {
    let feed = state
        .profile_service
        .profile_feed(viewer.user_id(), &username, query.request())
        .await?;
    Ok(Json(feed.into()))
}

#[utoipa::path(
    get,
    path = "/profile/edit/",
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current profile form values", body = ProfileFormDto),
        (status = 303, description = "Login required")
    )
)]
pub(crate) async fn edit_profile_form(
    State(state): State<AppState>,
    viewer: Viewer,
) -> AppResult<Json<ProfileFormDto>> {
    let user = state
        .profile_service
        .profile_for_edit(viewer.user_id())
        .await?;
    Ok(Json(user.profile().into()))
}

#[utoipa::path(
    post,
    path = "/profile/edit/",
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    ),
    request_body = ProfileFormDto,
    responses(
        (status = 303, description = "Updated, redirects to the profile; or login required"),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Username taken", body = ErrorBody)
    )
)]
pub(crate) async fn edit_profile(
    State(state): State<AppState>,
    viewer: Viewer,
    body: Result<Json<ProfileFormDto>, JsonRejection>,
) -> AppResult<Redirect> {
    let dto = submitted(body, state.profile_service.profile_for_edit(viewer.user_id())).await?;
    let user = state
        .profile_service
        .update_profile(viewer.user_id(), dto.into())
        .await?;
    Ok(Redirect::to(&profile_path(&user.username)))
}
