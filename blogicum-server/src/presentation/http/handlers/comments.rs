use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::comment_repository::CommentItem;
use crate::domain::comment::{Comment, CommentForm};
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppResult, ErrorBody};
use crate::presentation::http::extract::{Path, submitted};
use crate::presentation::http::middleware::auth::Viewer;
use crate::presentation::http::routes::post_detail_path;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub(crate) struct CommentFormDto {
    pub(crate) text: String,
}

impl From<CommentFormDto> for CommentForm {
    fn from(dto: CommentFormDto) -> Self {
        Self { text: dto.text }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    /// Present when listed under a post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) author: Option<String>,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author: None,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

impl From<CommentItem> for CommentDto {
    fn from(item: CommentItem) -> Self {
        Self {
            author: Some(item.author_username),
            ..CommentDto::from(item.comment)
        }
    }
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comment/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 303, description = "Added, redirects to the post; or login required"),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Post missing or hidden")
    )
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(post_id): Path<i64>,
    body: Result<Json<CommentFormDto>, JsonRejection>,
) -> AppResult<Redirect> {
    let dto = submitted(
        body,
        state.comment_service.commentable_post(viewer.user_id(), post_id),
    )
    .await?;
    state
        .comment_service
        .add_comment(viewer.user_id(), post_id, dto.into())
        .await?;
    Ok(Redirect::to(&post_detail_path(post_id)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/comment/{comment_id}/edit/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Current comment form values", body = CommentFormDto),
        (status = 303, description = "Login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Comment not found under this post")
    )
)]
pub(crate) async fn edit_comment_form(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentFormDto>> {
    let comment = state
        .comment_service
        .comment_for_edit(viewer.user_id(), post_id, comment_id)
        .await?;
    Ok(Json(CommentFormDto { text: comment.text }))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comment/{comment_id}/edit/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentFormDto,
    responses(
        (status = 303, description = "Updated, redirects to the post; or login required"),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Comment not found under this post")
    )
)]
pub(crate) async fn edit_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    body: Result<Json<CommentFormDto>, JsonRejection>,
) -> AppResult<Redirect> {
    let dto = submitted(
        body,
        state
            .comment_service
            .comment_for_edit(viewer.user_id(), post_id, comment_id),
    )
    .await?;
    state
        .comment_service
        .update_comment(viewer.user_id(), post_id, comment_id, dto.into())
        .await?;
    Ok(Redirect::to(&post_detail_path(post_id)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/comment/{comment_id}/delete/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment pending deletion", body = CommentDto),
        (status = 303, description = "Login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Comment not found under this post")
    )
)]
pub(crate) async fn delete_comment_confirm(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Json<CommentDto>> {
    let comment = state
        .comment_service
        .comment_for_delete(viewer.user_id(), post_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comment/{comment_id}/delete/",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 303, description = "Deleted, redirects to the post; or login required"),
        (status = 403, description = "Not the author", body = ErrorBody),
        (status = 404, description = "Comment not found under this post")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<Redirect> {
    state
        .comment_service
        .delete_comment(viewer.user_id(), post_id, comment_id)
        .await?;
    Ok(Redirect::to(&post_detail_path(post_id)))
}
