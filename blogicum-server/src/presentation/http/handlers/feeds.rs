use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::blog_service::CategoryFeed;
use crate::application::pagination::{Page, PageRequest};
use crate::data::post_repository::PostListItem;
use crate::domain::category::Category;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::Path;

/// Anything that is not a number means the first page.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    pub(crate) page: Option<String>,
}

impl PageQuery {
    pub(crate) fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: i64,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) description: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            title: category.title,
            description: category.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostCardDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
    pub(crate) pub_date: DateTime<Utc>,
    pub(crate) is_published: bool,
    pub(crate) author_id: i64,
    pub(crate) author: String,
    pub(crate) category: Option<CategoryDto>,
    pub(crate) location: Option<String>,
    pub(crate) comment_count: i64,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<PostListItem> for PostCardDto {
    fn from(item: PostListItem) -> Self {
        let post = item.post;
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            image: post.image,
            pub_date: post.pub_date,
            is_published: post.is_published,
            author_id: post.author_id,
            author: item.author_username,
            category: item.category.map(CategoryDto::from),
            location: item.location.map(|location| location.name),
            comment_count: item.comment_count,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostPageDto {
    pub(crate) posts: Vec<PostCardDto>,
    pub(crate) number: u32,
    pub(crate) num_pages: u32,
    pub(crate) total: i64,
    pub(crate) page_size: u32,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl From<Page<PostListItem>> for PostPageDto {
    fn from(page: Page<PostListItem>) -> Self {
        Self {
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            page_size: page.page_size,
            posts: page.items.into_iter().map(PostCardDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryFeedDto {
    pub(crate) category: CategoryDto,
    pub(crate) page: PostPageDto,
}

impl From<CategoryFeed> for CategoryFeedDto {
    fn from(feed: CategoryFeed) -> Self {
        Self {
            category: feed.category.into(),
            page: feed.page.into(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "feeds",
    params(
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Published posts", body = PostPageDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PostPageDto>> {
    let page = state.blog_service.index_feed(query.request()).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/category/{slug}/",
    tag = "feeds",
    params(
        ("slug" = String, Path, description = "Category slug"),
        ("page" = Option<String>, Query, description = "1-based page number")
    ),
    responses(
        (status = 200, description = "Published posts of the category", body = CategoryFeedDto),
        (status = 404, description = "Category missing or unpublished"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn category_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CategoryFeedDto>> {
    let feed = state
        .blog_service
        .category_feed(&slug, query.request())
        .await?;
    Ok(Json(feed.into()))
}
