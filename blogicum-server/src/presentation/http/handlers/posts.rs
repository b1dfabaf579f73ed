use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Redirect,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::blog_service::PostDetail;
use crate::application::require_actor;
use crate::domain::post::{PostFields, PostForm};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::extract::{Path, submitted};
use crate::presentation::http::handlers::comments::CommentDto;
use crate::presentation::http::handlers::feeds::PostCardDto;
use crate::presentation::http::middleware::auth::Viewer;
use crate::presentation::http::routes::{post_detail_path, profile_path};

/// Post form as exchanged with clients. Missing fields fall back to their
/// defaults so that field checks run after the ownership check.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub(crate) struct PostFormDto {
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]` in UTC; empty means now.
    pub(crate) pub_date: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) category_id: Option<i64>,
    pub(crate) location_id: Option<i64>,
}

impl Default for PostFormDto {
    fn default() -> Self {
        Self {
            title: String::new(),
            text: String::new(),
            image: None,
            pub_date: None,
            is_published: true,
            category_id: None,
            location_id: None,
        }
    }
}

impl From<PostFields> for PostFormDto {
    fn from(fields: PostFields) -> Self {
        Self {
            title: fields.title,
            text: fields.text,
            image: fields.image,
            pub_date: Some(fields.pub_date.to_rfc3339_opts(SecondsFormat::Secs, true)),
            is_published: fields.is_published,
            category_id: fields.category_id,
            location_id: fields.location_id,
        }
    }
}

impl From<PostFormDto> for PostForm {
    fn from(dto: PostFormDto) -> Self {
        Self {
            title: dto.title,
            text: dto.text,
            image: dto.image,
            pub_date: dto.pub_date,
            is_published: dto.is_published,
            category_id: dto.category_id,
            location_id: dto.location_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) post: PostCardDto,
    pub(crate) comments: Vec<CommentDto>,
}

impl From<PostDetail> for PostDetailDto {
    fn from(detail: PostDetail) -> Self {
        Self {
            post: detail.item.into(),
            comments: detail.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/posts/{id}/",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post with its comments", body = PostDetailDto),
        (status = 404, description = "Post missing or not published"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDetailDto>> {
    let detail = state.blog_service.post_detail(id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    get,
    path = "/posts/create/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Empty post form", body = PostFormDto),
        (status = 303, description = "Login required")
    )
)]
pub(crate) async fn create_post_form(viewer: Viewer) -> AppResult<Json<PostFormDto>> {
    require_actor(viewer.user_id())?;
    Ok(Json(PostFormDto {
        pub_date: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        ..PostFormDto::default()
    }))
}

#[utoipa::path(
    post,
    path = "/posts/create/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = PostFormDto,
    responses(
        (status = 303, description = "Created, redirects to the author's profile; or login required"),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    viewer: Viewer,
    body: Result<Json<PostFormDto>, JsonRejection>,
) -> AppResult<Redirect> {
    let dto = submitted(body, async { require_actor(viewer.user_id()) }).await?;
    let item = state
        .blog_service
        .create_post(viewer.user_id(), dto.into())
        .await?;
    Ok(Redirect::to(&profile_path(&item.author_username)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/edit/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Current post form values", body = PostFormDto),
        (status = 303, description = "Login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn edit_post_form(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> AppResult<Json<PostFormDto>> {
    let post = state.blog_service.post_for_edit(viewer.user_id(), id).await?;
    Ok(Json(post.fields().into()))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/edit/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PostFormDto,
    responses(
        (status = 303, description = "Updated, redirects to the post; or login required"),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn edit_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
    body: Result<Json<PostFormDto>, JsonRejection>,
) -> AppResult<Redirect> {
    let dto = submitted(body, state.blog_service.post_for_edit(viewer.user_id(), id)).await?;
    let post = state
        .blog_service
        .update_post(viewer.user_id(), id, dto.into())
        .await?;
    Ok(Redirect::to(&post_detail_path(post.id)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/delete/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post pending deletion", body = PostCardDto),
        (status = 303, description = "Login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn delete_post_confirm(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> AppResult<Json<PostCardDto>> {
    let item = state
        .blog_service
        .post_for_delete(viewer.user_id(), id)
        .await?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/delete/",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 303, description = "Deleted, redirects to the author's profile; or login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Post not found")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let item = state.blog_service.delete_post(viewer.user_id(), id).await?;
    Ok(Redirect::to(&profile_path(&item.author_username)))
}
