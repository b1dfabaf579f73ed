use async_trait::async_trait;

use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostFields};
use crate::domain::visibility::Visibility;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) author_id: i64,
    pub(crate) fields: PostFields,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl Pagination {
    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * self.limit()
    }
}

/// Narrows a listing down to one author and/or one category.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PostFilter {
    pub(crate) author_id: Option<i64>,
    pub(crate) category_id: Option<i64>,
    pub(crate) visibility: Visibility,
}

/// A post together with what a listing or detail page shows next to it.
#[derive(Debug, Clone)]
pub(crate) struct PostListItem {
    pub(crate) post: Post,
    pub(crate) author_username: String,
    pub(crate) category: Option<Category>,
    pub(crate) location: Option<Location>,
    pub(crate) comment_count: i64,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post_item(&self, id: i64) -> Result<Option<PostListItem>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostFields,
    ) -> Result<Option<Post>, DomainError>;
    /// Comments go with the post.
    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError>;
    /// Ordered by `pub_date` descending, then id descending.
    async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostListItem>, DomainError>;
    async fn count_posts(&self, filter: PostFilter) -> Result<i64, DomainError>;
}
