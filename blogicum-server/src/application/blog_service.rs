use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::pagination::{Page, PageRequest};
use super::require_actor;
use crate::data::category_repository::{CategoryRepository, LocationRepository};
use crate::data::comment_repository::{CommentItem, CommentRepository};
use crate::data::post_repository::{NewPost, PostFilter, PostListItem, PostRepository};
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::ownership::ensure_author;
use crate::domain::post::{Post, PostFields, PostForm};
use crate::domain::visibility::{Visibility, is_publicly_visible};

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) item: PostListItem,
    pub(crate) comments: Vec<CommentItem>,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryFeed {
    pub(crate) category: Category,
    pub(crate) page: Page<PostListItem>,
}

pub(crate) struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl BlogService {
    pub(crate) fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            categories,
            locations,
        }
    }

    pub(crate) async fn index_feed(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostListItem>, DomainError> {
        let filter = PostFilter {
            author_id: None,
            category_id: None,
            visibility: Visibility::Public { now: Utc::now() },
        };
        load_page(self.posts.as_ref(), filter, page).await
    }

    pub(crate) async fn category_feed(
        &self,
        slug: &str,
        page: PageRequest,
    ) -> Result<CategoryFeed, DomainError> {
        let category = self
            .categories
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {slug}")))?;

        let filter = PostFilter {
            author_id: None,
            category_id: Some(category.id),
            visibility: Visibility::Public { now: Utc::now() },
        };
        let page = load_page(self.posts.as_ref(), filter, page).await?;

        Ok(CategoryFeed { category, page })
    }

    /// Hidden posts are reported as missing, to their author as well.
    pub(crate) async fn post_detail(&self, post_id: i64) -> Result<PostDetail, DomainError> {
        let item = self.fetch_post(post_id).await?;
        if !is_publicly_visible(&item.post, item.category.as_ref(), Utc::now()) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        let comments = self.comments.list_for_post(post_id).await?;

        Ok(PostDetail { item, comments })
    }

    pub(crate) async fn create_post(
        &self,
        actor_id: Option<i64>,
        form: PostForm,
    ) -> Result<PostListItem, DomainError> {
        let author_id = require_actor(actor_id)?;
        let fields = form.validate(Utc::now())?;
        self.check_references(&fields).await?;

        let post = self
            .posts
            .create_post(NewPost { author_id, fields })
            .await?;
        info!(post_id = post.id, author_id, "post created");

        self.fetch_post(post.id).await
    }

    pub(crate) async fn post_for_edit(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let (_, item) = self
            .owned_post(actor_id, post_id, "you cannot edit this post")
            .await?;
        Ok(item.post)
    }

    pub(crate) async fn update_post(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let (actor_id, _) = self
            .owned_post(actor_id, post_id, "you cannot edit this post")
            .await?;
        let fields = form.validate(Utc::now())?;
        self.check_references(&fields).await?;

        let post = self
            .posts
            .update_post_owned(post_id, actor_id, fields)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;
        info!(post_id, author_id = actor_id, "post updated");
        Ok(post)
    }

    pub(crate) async fn post_for_delete(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
    ) -> Result<PostListItem, DomainError> {
        let (_, item) = self
            .owned_post(actor_id, post_id, "you cannot delete this post")
            .await?;
        Ok(item)
    }

    /// Returns the removed post so the caller knows where to send the author next.
    pub(crate) async fn delete_post(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
    ) -> Result<PostListItem, DomainError> {
        let (actor_id, item) = self
            .owned_post(actor_id, post_id, "you cannot delete this post")
            .await?;

        let deleted = self.posts.delete_post_owned(post_id, actor_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        info!(post_id, author_id = actor_id, "post deleted");
        Ok(item)
    }

    async fn fetch_post(&self, post_id: i64) -> Result<PostListItem, DomainError> {
        self.posts
            .get_post_item(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    /// Fetch, then authentication, then ownership, in that order.
    async fn owned_post(
        &self,
        actor_id: Option<i64>,
        post_id: i64,
        refusal: &'static str,
    ) -> Result<(i64, PostListItem), DomainError> {
        let item = self.fetch_post(post_id).await?;
        let actor_id = require_actor(actor_id)?;
        if let Err(err) = ensure_author(&item.post, actor_id, refusal) {
            warn!(post_id, actor_id, "post ownership check refused");
            return Err(err);
        }
        Ok((actor_id, item))
    }

    async fn check_references(&self, fields: &PostFields) -> Result<(), DomainError> {
        if let Some(id) = fields.category_id
            && self.categories.get_category(id).await?.is_none()
        {
            return Err(DomainError::validation("category_id", "unknown category"));
        }
        if let Some(id) = fields.location_id
            && self.locations.get_location(id).await?.is_none()
        {
            return Err(DomainError::validation("location_id", "unknown location"));
        }
        Ok(())
    }
}

/// Counts first so that an out-of-range page lands on the nearest real one.
pub(crate) async fn load_page(
    posts: &dyn PostRepository,
    filter: PostFilter,
    page: PageRequest,
) -> Result<Page<PostListItem>, DomainError> {
    let total = posts.count_posts(filter).await?;
    let window = page.resolve(total);
    let items = posts.list_posts(filter, window.pagination()).await?;

    Ok(Page::new(items, window, total))
}
