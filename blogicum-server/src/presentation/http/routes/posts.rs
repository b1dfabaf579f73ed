use axum::Router;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::{
    add_comment, delete_comment, delete_comment_confirm, edit_comment, edit_comment_form,
};
use crate::presentation::http::handlers::feeds::{category_posts, index};
use crate::presentation::http::handlers::posts::{
    create_post, create_post_form, delete_post, delete_post_confirm, edit_post, edit_post_form,
    post_detail,
};

pub(crate) fn router() -> Router<AppState> {
    let feeds = Router::new()
        .route("/", get(index))
        .route("/category/{slug}/", get(category_posts));

    let posts = Router::new()
        .route("/posts/create/", get(create_post_form).post(create_post))
        .route("/posts/{id}/", get(post_detail).post(add_comment))
        .route("/posts/{id}/edit/", get(edit_post_form).post(edit_post))
        .route("/posts/{id}/delete/", get(delete_post_confirm).post(delete_post));

    let comments = Router::new()
        .route("/posts/{id}/comment/", post(add_comment))
        .route(
            "/posts/{id}/comment/{comment_id}/edit/",
            get(edit_comment_form).post(edit_comment),
        )
        .route(
            "/posts/{id}/comment/{comment_id}/delete/",
            get(delete_comment_confirm).post(delete_comment),
        );

    feeds.merge(posts).merge(comments)
}
